pub mod stored_collection;

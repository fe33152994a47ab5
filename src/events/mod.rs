use crate::models::ServiceOrderStatus;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// True once the event processor has stopped
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Sends an event, logging instead of failing when the consumer is gone
    pub async fn send_or_log(&self, event: Event) {
        if let Err(e) = self.send(event).await {
            warn!(error = %e, "domain event dropped");
        }
    }
}

/// Domain events emitted after successful mutations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    EmployeeCreated(String),
    EmployeeUpdated(String),
    EmployeeDeleted(String),

    EquipmentCreated(String),
    EquipmentUpdated(String),
    EquipmentDeleted(String),

    InspectionCategoryCreated(String),
    InspectionCategoryUpdated(String),
    InspectionCategoryDeleted(String),
    InspectionCategoriesSeeded(usize),

    ChecklistCreated(String),
    ChecklistUpdated(String),
    ChecklistDeleted(String),

    ServiceOrderCreated {
        order_id: String,
        number: String,
    },
    ServiceOrderUpdated(String),
    ServiceOrderStatusChanged {
        order_id: String,
        old_status: ServiceOrderStatus,
        new_status: ServiceOrderStatus,
    },
    ServiceOrderDeleted(String),

    CompanyUpdated(String),
    CompanyLogoUploaded {
        company_id: String,
        position: String,
    },
    CompanyLogoRemoved {
        company_id: String,
        position: String,
    },
}

/// Consumes domain events until every sender is dropped
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match &event {
            Event::ServiceOrderStatusChanged {
                order_id,
                old_status,
                new_status,
            } => info!(
                order_id = %order_id,
                old_status = old_status.as_ref(),
                new_status = new_status.as_ref(),
                "service order status changed"
            ),
            Event::ServiceOrderCreated { order_id, number } => {
                info!(order_id = %order_id, number = %number, "service order created")
            }
            other => info!(event = ?other, "domain event"),
        }
    }

    info!("Event processing loop finished");
}

use crate::{
    errors::ServiceError,
    events::{Event, EventSender},
    models::{matches_search, new_id, Employee, EmployeeInput},
    repositories::CollectionRepository,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::search_term;

/// Service for managing employees
#[derive(Clone)]
pub struct EmployeeService {
    repository: Arc<CollectionRepository<Employee>>,
    event_sender: Arc<EventSender>,
}

impl EmployeeService {
    pub fn new(
        repository: Arc<CollectionRepository<Employee>>,
        event_sender: Arc<EventSender>,
    ) -> Self {
        Self {
            repository,
            event_sender,
        }
    }

    /// Lists employees, optionally filtered by name, DRT or role
    #[instrument(skip(self))]
    pub async fn list(&self, search: Option<&str>) -> Result<Vec<Employee>, ServiceError> {
        let employees = self.repository.list().await?;
        Ok(match search_term(search) {
            Some(term) => employees
                .into_iter()
                .filter(|e| {
                    matches_search(&e.name, &term)
                        || matches_search(&e.drt, &term)
                        || matches_search(&e.role, &term)
                })
                .collect(),
            None => employees,
        })
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Employee, ServiceError> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Employee {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn create(&self, input: EmployeeInput) -> Result<Employee, ServiceError> {
        let employee = input.into_employee(new_id())?;
        let employee = self.repository.insert(employee).await?;

        self.event_sender
            .send_or_log(Event::EmployeeCreated(employee.id.clone()))
            .await;
        info!(employee_id = %employee.id, "employee created");
        Ok(employee)
    }

    #[instrument(skip(self))]
    pub async fn update(&self, id: &str, input: EmployeeInput) -> Result<Employee, ServiceError> {
        let employee = input.into_employee(id.to_string())?;
        let employee = self.repository.replace(id, employee).await?;

        self.event_sender
            .send_or_log(Event::EmployeeUpdated(employee.id.clone()))
            .await;
        Ok(employee)
    }

    /// Removes an employee. Orders referencing it keep the dangling id.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        if self.repository.delete(id).await? {
            self.event_sender
                .send_or_log(Event::EmployeeDeleted(id.to_string()))
                .await;
        }
        Ok(())
    }

    pub async fn count(&self) -> Result<usize, ServiceError> {
        Ok(self.repository.list().await?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support;
    use assert_matches::assert_matches;

    fn input(name: &str, drt: &str, role: &str) -> EmployeeInput {
        EmployeeInput {
            name: Some(name.into()),
            drt: Some(drt.into()),
            role: Some(role.into()),
        }
    }

    #[tokio::test]
    async fn create_search_and_delete() {
        let repos = test_support::repositories();
        let (events, mut rx) = test_support::events();
        let service = EmployeeService::new(repos.employees.clone(), events);

        let maria = service
            .create(input("Maria Souza", "DRT-1", "Eletricista"))
            .await
            .unwrap();
        service
            .create(input("João Lima", "DRT-2", "Mecânico"))
            .await
            .unwrap();
        assert_eq!(rx.recv().await, Some(Event::EmployeeCreated(maria.id.clone())));

        let found = service.list(Some("ELETRIC")).await.unwrap();
        assert_eq!(found, vec![maria.clone()]);
        assert_eq!(service.list(Some("  ")).await.unwrap().len(), 2);

        service.delete(&maria.id).await.unwrap();
        service.delete(&maria.id).await.unwrap();
        assert_eq!(service.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn update_of_missing_employee_is_not_found() {
        let repos = test_support::repositories();
        let (events, _rx) = test_support::events();
        let service = EmployeeService::new(repos.employees, events);

        assert_matches!(
            service.update("ghost", input("A", "B", "C")).await,
            Err(ServiceError::NotFound(_))
        );
    }

    #[tokio::test]
    async fn invalid_input_writes_nothing() {
        let repos = test_support::repositories();
        let (events, _rx) = test_support::events();
        let service = EmployeeService::new(repos.employees.clone(), events);

        assert_matches!(
            service.create(input("Ana", "", "Técnica")).await,
            Err(ServiceError::MissingField { field: "drt", .. })
        );
        assert!(!repos.employees.is_persisted().await.unwrap());
    }
}

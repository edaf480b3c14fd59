//! Task repository: CRUD and status transitions.

use noces_core::entities::{Entity, Task};
use noces_core::enums::TaskStatus;
use noces_core::errors::CoreError;
use noces_core::validation::require_non_blank;
use serde_json::Value;

use super::{invalid_transition, to_body, to_patch};
use crate::error::DatabaseError;
use crate::query::Query;
use crate::service::NocesService;
use crate::updates::task::{NewTask, TaskUpdate};

fn validate_task(task: &Task) -> Result<(), CoreError> {
    require_non_blank("title", &task.title)
}

impl NocesService {
    pub async fn create_task(&self, input: NewTask) -> Result<Task, DatabaseError> {
        require_non_blank("title", &input.title)?;
        let mut body = to_body(&input)?;
        body.insert("status".into(), serde_json::to_value(TaskStatus::Todo)?);
        self.create_entity(Value::Object(body)).await
    }

    pub async fn get_task(&self, id: &str) -> Result<Task, DatabaseError> {
        self.get_entity(id).await
    }

    pub async fn list_tasks(&self, query: &Query) -> Result<Vec<Task>, DatabaseError> {
        self.list_entities(query).await
    }

    pub async fn update_task(&self, id: &str, update: TaskUpdate) -> Result<Task, DatabaseError> {
        self.patch_entity(id, to_patch(&update)?, validate_task)
            .await
    }

    pub async fn delete_task(&self, id: &str) -> Result<(), DatabaseError> {
        self.delete_entity::<Task>(id).await
    }

    pub async fn transition_task(&self, id: &str, status: TaskStatus) -> Result<Task, DatabaseError> {
        self.modify_entity(id, |task: &mut Task| {
            if !task.status.can_transition_to(status) {
                return Err(invalid_transition(Task::NAME, id, task.status, status));
            }
            task.status = status;
            Ok(())
        })
        .await
    }

    /// Mark a task done. Completing a done task is a no-op.
    pub async fn complete_task(&self, id: &str) -> Result<Task, DatabaseError> {
        let task = self.get_task(id).await?;
        if task.status == TaskStatus::Done {
            return Ok(task);
        }
        self.transition_task(id, TaskStatus::Done).await
    }
}

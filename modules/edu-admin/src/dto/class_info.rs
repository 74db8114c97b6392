use chrono::Utc;
use eduadmin_db::crud::{InsertCommand, RemoveCommand, UpdateCommand};
use eduadmin_db::paging::PageRequest;
use eduadmin_db::search::{SearchRange, Searchable};
use eduadmin_db::secure::RecordId;
use eduadmin_errors::ValidationViolation;
use sea_orm::{IntoActiveModel, Set};
use serde::{Deserialize, Serialize};

use super::{Validate, into_result, require_non_empty, require_non_negative};
use crate::infra::storage::entity::em_class_info::{ActiveModel, Entity, Model};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Searchable)]
#[serde(rename_all = "camelCase", default)]
pub struct GetPageReq {
    #[serde(flatten)]
    #[search(pagination)]
    pub page: PageRequest,
    #[search(op = "contains")]
    pub class_name: String,
    #[search(op = "exact")]
    pub grade: String,
    #[search(op = "exact")]
    pub status: String,
    /// Inclusive bounds; either side may be left at 0.
    #[search(op = "range")]
    pub student_count: SearchRange<i32>,
    #[search(op = "in", column = "id")]
    pub ids: Vec<RecordId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetReq {
    pub id: RecordId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InsertReq {
    pub class_name: String,
    pub grade: String,
    pub head_teacher: String,
    pub student_count: i32,
    pub status: String,
    pub dept_id: i32,
}

impl Validate for InsertReq {
    fn validate(&self) -> Result<(), Vec<ValidationViolation>> {
        let mut violations = Vec::new();
        require_non_empty(&mut violations, "className", &self.class_name);
        require_non_negative(&mut violations, "studentCount", self.student_count);
        into_result(violations)
    }
}

impl InsertCommand<Entity> for InsertReq {
    fn generate(&self) -> ActiveModel {
        let now = Utc::now();
        ActiveModel {
            class_name: Set(self.class_name.trim().to_owned()),
            grade: Set(self.grade.clone()),
            head_teacher: Set(self.head_teacher.clone()),
            student_count: Set(self.student_count),
            status: Set(self.status.clone()),
            dept_id: Set(self.dept_id),
            create_by: Set(0),
            update_by: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateReq {
    pub id: RecordId,
    pub class_name: String,
    pub grade: String,
    pub head_teacher: String,
    pub student_count: i32,
    pub status: String,
}

impl Validate for UpdateReq {
    fn validate(&self) -> Result<(), Vec<ValidationViolation>> {
        let mut violations = Vec::new();
        require_non_empty(&mut violations, "className", &self.class_name);
        require_non_negative(&mut violations, "studentCount", self.student_count);
        into_result(violations)
    }
}

impl UpdateCommand<Entity> for UpdateReq {
    fn id(&self) -> RecordId {
        self.id
    }

    fn apply(&self, current: Model) -> ActiveModel {
        let mut am = current.into_active_model();
        am.class_name = Set(self.class_name.trim().to_owned());
        am.grade = Set(self.grade.clone());
        am.head_teacher = Set(self.head_teacher.clone());
        am.student_count = Set(self.student_count);
        am.status = Set(self.status.clone());
        am.updated_at = Set(Utc::now());
        am
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteReq {
    pub ids: Vec<RecordId>,
}

impl RemoveCommand for DeleteReq {
    fn ids(&self) -> &[RecordId] {
        &self.ids
    }
}

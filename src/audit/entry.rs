//! Audit log records
//!
//! One `AuditEntry` per stored change, serialized as a JSON line.

use std::fmt::{self, Write as _};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which store a change touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    IncomeSource,
    PayPeriod,
    Bill,
    BillAssignment,
}

impl EntityType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::IncomeSource => "IncomeSource",
            Self::PayPeriod => "PayPeriod",
            Self::Bill => "Bill",
            Self::BillAssignment => "BillAssignment",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub operation: Operation,
    pub entity_type: EntityType,
    pub entity_id: String,

    /// Bill or source name when there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,

    /// Changed fields of an update, as `field: old -> new`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

fn snapshot<T: Serialize>(entity: &T) -> Option<Value> {
    serde_json::to_value(entity).ok()
}

impl AuditEntry {
    fn record(
        operation: Operation,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: Option<Value>,
        after: Option<Value>,
    ) -> Self {
        let diff_summary = match (&before, &after) {
            (Some(old), Some(new)) => super::generate_diff(old, new),
            _ => None,
        };
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id: entity_id.into(),
            entity_name,
            before,
            after,
            diff_summary,
        }
    }

    pub fn create<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self::record(Operation::Create, entity_type, entity_id, entity_name, None, snapshot(entity))
    }

    pub fn update<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Self {
        Self::record(
            Operation::Update,
            entity_type,
            entity_id,
            entity_name,
            snapshot(before),
            snapshot(after),
        )
    }

    pub fn delete<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self::record(Operation::Delete, entity_type, entity_id, entity_name, snapshot(entity), None)
    }

    /// `[time] OP Type id (name)`, with changed fields on a second line
    pub fn format_human_readable(&self) -> String {
        let mut line = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );
        if let Some(name) = &self.entity_name {
            let _ = write!(line, " ({name})");
        }
        if let Some(diff) = &self.diff_summary {
            let _ = write!(line, "\n  Changes: {diff}");
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display() {
        assert_eq!(Operation::Delete.to_string(), "DELETE");
        assert_eq!(EntityType::BillAssignment.to_string(), "BillAssignment");
        assert_eq!(
            serde_json::to_string(&EntityType::IncomeSource).unwrap(),
            "\"income_source\""
        );
    }

    #[test]
    fn test_create_entry() {
        let entry = AuditEntry::create(
            EntityType::Bill,
            "bil-12345678",
            Some("Rent".to_string()),
            &json!({"name": "Rent", "due_day": 5}),
        );

        assert_eq!(entry.operation, Operation::Create);
        assert!(entry.before.is_none());
        assert_eq!(entry.after.unwrap()["due_day"], 5);
    }

    #[test]
    fn test_update_entry_has_diff() {
        let entry = AuditEntry::update(
            EntityType::BillAssignment,
            "asg-12345678",
            None,
            &json!({"status": "pending", "planned_amount": 6000}),
            &json!({"status": "paid", "planned_amount": 6000}),
        );

        assert_eq!(entry.operation, Operation::Update);
        assert_eq!(
            entry.diff_summary.as_deref(),
            Some("status: \"pending\" -> \"paid\"")
        );
    }

    #[test]
    fn test_delete_entry() {
        let entry = AuditEntry::delete(EntityType::BillAssignment, "asg-1", None, &json!({}));
        assert_eq!(entry.operation, Operation::Delete);
        assert!(entry.before.is_some());
        assert!(entry.after.is_none());
    }

    #[test]
    fn test_human_readable_format() {
        let entry = AuditEntry::create(
            EntityType::IncomeSource,
            "inc-12345678",
            Some("Salary".to_string()),
            &json!({"name": "Salary"}),
        );

        let formatted = entry.format_human_readable();
        assert!(formatted.contains("CREATE IncomeSource inc-12345678 (Salary)"));
    }

    #[test]
    fn test_update_lists_changes_on_second_line() {
        let entry = AuditEntry::update(
            EntityType::Bill,
            "bil-12345678",
            Some("Power".to_string()),
            &json!({"due_day": 20}),
            &json!({"due_day": 22}),
        );

        let formatted = entry.format_human_readable();
        let lines: Vec<&str> = formatted.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("UPDATE Bill bil-12345678 (Power)"));
        assert_eq!(lines[1], "  Changes: due_day: 20 -> 22");

        let unchanged = AuditEntry::update(EntityType::Bill, "bil-1", None, &json!({}), &json!({}));
        assert!(unchanged.diff_summary.is_none());
        assert!(!unchanged.format_human_readable().contains("Changes"));
    }
}

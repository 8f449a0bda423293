//! Testing utilities for Comply workspace
//!
//! Shared node builders, a canned questionnaire schema and matching
//! captured values.

#![allow(missing_docs)]

use comply_schema::parsers::{JsonSchemaParser, SchemaParser};
use comply_schema::{FieldNode, NodeId, NodeIdAllocator, Schema, Step, ValueStore};

/// Builds nodes with sequential ids
#[derive(Debug, Default)]
pub struct Fixture {
    ids: NodeIdAllocator,
}

impl Fixture {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> NodeId {
        self.ids.allocate().expect("fixture node ids exhausted")
    }

    pub fn leaf(&mut self, name: &str) -> FieldNode {
        FieldNode::new(self.next_id())
            .with_field_type("text")
            .with_field_name(name)
    }

    pub fn requirement(&mut self, key: &str) -> FieldNode {
        FieldNode::new(self.next_id())
            .with_field_type("requirement")
            .with_requirement_control_number(key)
    }

    pub fn implementation(&mut self, name: &str, field_type: &str, keys: &str) -> FieldNode {
        FieldNode::new(self.next_id())
            .with_field_type(field_type)
            .with_field_name(name)
            .with_requirement_control_number(keys)
    }

    pub fn group(&mut self, name: &str, children: Vec<FieldNode>) -> FieldNode {
        children.into_iter().fold(
            FieldNode::new(self.next_id())
                .with_field_type("fieldGroup")
                .with_field_name(name),
            FieldNode::with_child,
        )
    }
}

pub fn single_step_schema(step_name: &str, fields: Vec<FieldNode>) -> Schema {
    Schema::new().with_step("Phase", Step::named(step_name, fields))
}

pub const SAMPLE_SCHEMA_JSON: &str = r#"{
  "Preparation": [
    {
      "StepName": "Article 21 - Risk management",
      "Fields": [
        {
          "FieldType": "fieldGroup",
          "FieldName": "Governance",
          "Role": "Admin",
          "TrustDimension": "Security",
          "controls": [
            {"FieldType": "requirement", "requirement_control_number": "21.2(a)", "Role": "Admin", "TrustDimension": "Security"},
            {"FieldType": "requirement", "requirement_control_number": "21.2(b)", "Role": "Auditor", "TrustDimension": "Privacy"}
          ]
        },
        {"FieldType": "risk", "FieldName": "risk-1", "requirement_control_number": "21.2(a)", "Role": "Admin", "TrustDimension": "Security"},
        {"FieldType": "plan", "FieldName": "plan-1", "requirement_control_number": "21.2(a),21.2(b)", "Role": "Auditor", "TrustDimension": "Comply"},
        {
          "FieldType": "fieldGroup",
          "FieldName": "Incident handling",
          "controls": [
            {"FieldType": "requirement", "requirement_control_number": "21.2(c)", "Role": "Admin"}
          ]
        },
        {"FieldType": "objective", "FieldName": "obj-1", "Control": "21.2(c)", "Role": "Admin", "TrustDimension": "Resilience"}
      ]
    },
    {
      "StepName": "Introduction",
      "Fields": [
        {"FieldType": "text", "FieldName": "intro"},
        {"FieldType": "plan", "FieldName": "plan-x", "requirement_control_number": "21.2(a)"}
      ]
    }
  ],
  "Operation": [
    {
      "StepName": "Article 23 - Reporting",
      "Fields": [
        {
          "FieldType": "fieldGroup",
          "FieldName": "Reporting",
          "Role": "Auditor",
          "controls": [
            {"FieldType": "requirement", "requirement_control_number": "23.1"}
          ],
          "Fields": [
            {"FieldType": "test", "FieldName": "test-1", "requirement_control_number": "23.1", "Role": "Auditor"}
          ]
        }
      ]
    }
  ]
}"#;

/// Parsed [`SAMPLE_SCHEMA_JSON`]
pub fn sample_schema() -> Schema {
    JsonSchemaParser
        .parse(SAMPLE_SCHEMA_JSON)
        .unwrap()
}

/// Captured values for [`sample_schema`]
///
/// `21.2(b)` is Not Applicable; `risk-1`, `obj-1` and `test-1` have
/// evidence, `plan-1` does not.
pub fn sample_values() -> ValueStore {
    ValueStore::new()
        .with_status("21.2(a)", "Applicable")
        .with_status("21.2(b)", "Not Applicable")
        .with_status("21.2(c)", "Applicable")
        .with_status("23.1", "Applicable")
        .with_evidence("risk-1", "https://docs/risk-register")
        .with_evidence("obj-1", "ticket-42")
        .with_evidence("test-1", "pentest report")
}

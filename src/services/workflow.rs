//! Workflow templates, assignment and step tracking.
//!
//! Assignment is idempotent per (employee, template) while an instance is
//! still open. Updating a step rolls its status up into the parent workflow
//! with [`roll_up_workflow_status`].

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::calculation::{roll_up_workflow_status, StepState};
use crate::error::{HrError, HrResult};
use crate::models::{
    EmployeeWorkflow, EmployeeWorkflowStep, EmploymentStatus, StepStatus, WorkflowStatus,
    WorkflowStepTemplate, WorkflowTemplate, WorkflowType,
};
use crate::store::{HrStore, Tables};

fn default_true() -> bool {
    true
}

/// A step of a new template.
#[derive(Debug, Clone, Deserialize)]
pub struct NewStepTemplate {
    /// Step name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Position within the template.
    pub order: u32,
    /// Whether the step gates completion.
    #[serde(default = "default_true")]
    pub is_mandatory: bool,
}

/// A new template with its steps.
#[derive(Debug, Clone, Deserialize)]
pub struct NewWorkflowTemplate {
    /// Unique name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Purpose of the template.
    pub workflow_type: WorkflowType,
    /// Inactive templates are never auto-assigned.
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Status that triggers automatic assignment.
    #[serde(default)]
    pub auto_assign_on_status: Option<EmploymentStatus>,
    /// Steps, in any order.
    #[serde(default)]
    pub steps: Vec<NewStepTemplate>,
}

/// Partial update of a template's own fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WorkflowTemplateUpdate {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New purpose.
    pub workflow_type: Option<WorkflowType>,
    /// New active flag.
    pub is_active: Option<bool>,
    /// New trigger status.
    pub auto_assign_on_status: Option<EmploymentStatus>,
    /// Removes the trigger status.
    pub clear_auto_assign: bool,
}

/// Template list filters.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct TemplateFilter {
    /// Only templates of this purpose.
    pub workflow_type: Option<WorkflowType>,
    /// Only active or inactive templates.
    pub is_active: Option<bool>,
}

/// A template with its steps in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateView {
    /// The template.
    #[serde(flatten)]
    pub template: WorkflowTemplate,
    /// Its steps, by `order`.
    pub steps: Vec<WorkflowStepTemplate>,
}

/// A step instance with its template details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepView {
    /// The step instance.
    #[serde(flatten)]
    pub step: EmployeeWorkflowStep,
    /// Step name.
    pub name: String,
    /// Position within the workflow.
    pub order: u32,
    /// Whether the step gates completion.
    pub is_mandatory: bool,
}

/// An assigned workflow with its steps in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowView {
    /// The workflow instance.
    #[serde(flatten)]
    pub workflow: EmployeeWorkflow,
    /// Name of the template it came from.
    pub template_name: String,
    /// Its steps, by `order`.
    pub steps: Vec<StepView>,
}

/// A change to one step of an assigned workflow.
#[derive(Debug, Clone, Deserialize)]
pub struct StepUpdate {
    /// New status.
    pub status: StepStatus,
    /// Notes replace the previous ones when given.
    #[serde(default)]
    pub notes: Option<String>,
    /// User completing the step.
    #[serde(default)]
    pub actor_user_id: Option<i64>,
}

/// Workflow operations over the shared store.
#[derive(Debug, Clone)]
pub struct WorkflowService {
    store: HrStore,
}

impl WorkflowService {
    /// Creates the service.
    pub fn new(store: HrStore) -> Self {
        Self { store }
    }

    /// Creates a template and its steps.
    pub fn create_template(&self, new: NewWorkflowTemplate) -> HrResult<TemplateView> {
        let name = new.name.trim().to_string();
        if name.is_empty() {
            return Err(HrError::validation("name", "must not be empty"));
        }
        if let Some(step) = new.steps.iter().find(|s| s.name.trim().is_empty()) {
            return Err(HrError::validation(
                "steps",
                format!("step at order {} has no name", step.order),
            ));
        }

        self.store.write(|tables| {
            ensure_unique_template(tables, &name, None)?;
            let now = Utc::now();
            let template_id = tables
                .workflow_templates
                .insert_with(|id| WorkflowTemplate {
                    id,
                    name,
                    description: new.description,
                    workflow_type: new.workflow_type,
                    is_active: new.is_active,
                    auto_assign_on_status: new.auto_assign_on_status,
                    created_at: now,
                    updated_at: now,
                })
                .id;
            for step in new.steps {
                tables
                    .workflow_step_templates
                    .insert_with(|id| WorkflowStepTemplate {
                        id,
                        template_id,
                        name: step.name.trim().to_string(),
                        description: step.description,
                        order: step.order,
                        is_mandatory: step.is_mandatory,
                    });
            }
            template_view(tables, template_id)
        })
    }

    /// Lists templates matching the filter.
    pub fn list_templates(&self, filter: TemplateFilter) -> Vec<TemplateView> {
        self.store.read(|tables| {
            tables
                .workflow_templates
                .iter()
                .filter(|t| filter.workflow_type.is_none_or(|w| t.workflow_type == w))
                .filter(|t| filter.is_active.is_none_or(|a| t.is_active == a))
                .filter_map(|t| template_view(tables, t.id).ok())
                .collect()
        })
    }

    /// Fetches one template with its steps.
    pub fn get_template(&self, id: i64) -> HrResult<TemplateView> {
        self.store.read(|tables| template_view(tables, id))
    }

    /// Updates a template's own fields; steps are left unchanged.
    pub fn update_template(&self, id: i64, update: WorkflowTemplateUpdate) -> HrResult<TemplateView> {
        self.store.write(|tables| {
            tables.workflow_templates.require(id)?;
            let name = match update.name.as_deref().map(str::trim) {
                Some("") => return Err(HrError::validation("name", "must not be empty")),
                Some(name) => {
                    ensure_unique_template(tables, name, Some(id))?;
                    Some(name.to_string())
                }
                None => None,
            };

            let template = tables.workflow_templates.require_mut(id)?;
            if let Some(name) = name {
                template.name = name;
            }
            if let Some(description) = update.description {
                template.description = Some(description);
            }
            if let Some(workflow_type) = update.workflow_type {
                template.workflow_type = workflow_type;
            }
            if let Some(is_active) = update.is_active {
                template.is_active = is_active;
            }
            if update.clear_auto_assign {
                template.auto_assign_on_status = None;
            } else if let Some(status) = update.auto_assign_on_status {
                template.auto_assign_on_status = Some(status);
            }
            template.updated_at = Utc::now();
            template_view(tables, id)
        })
    }

    /// Assigns a template to an employee, or returns the open instance.
    pub fn assign_workflow(
        &self,
        employee_id: i64,
        template_id: i64,
        due_date: Option<NaiveDate>,
    ) -> HrResult<WorkflowView> {
        self.store.write(|tables| {
            let workflow = assign(tables, employee_id, template_id, due_date)?;
            workflow_view(tables, &workflow)
        })
    }

    /// Lists an employee's workflows, optionally by status.
    pub fn list_employee_workflows(
        &self,
        employee_id: i64,
        status: Option<WorkflowStatus>,
    ) -> HrResult<Vec<WorkflowView>> {
        self.store.read(|tables| {
            tables.employees.require(employee_id)?;
            tables
                .employee_workflows
                .iter()
                .filter(|w| w.employee_id == employee_id && status.is_none_or(|s| w.status == s))
                .map(|w| workflow_view(tables, w))
                .collect()
        })
    }

    /// Fetches one assigned workflow.
    pub fn get_employee_workflow(&self, id: i64) -> HrResult<WorkflowView> {
        self.store.read(|tables| {
            let workflow = tables.employee_workflows.require(id)?;
            workflow_view(tables, workflow)
        })
    }

    /// Sets a step's status and notes, then rolls the status up into its
    /// workflow. Completion records the time and actor; any other status
    /// clears them.
    pub fn update_employee_workflow_step(
        &self,
        step_id: i64,
        update: StepUpdate,
    ) -> HrResult<WorkflowView> {
        self.store.write(|tables| {
            if let Some(actor) = update.actor_user_id {
                tables.users.require(actor)?;
            }

            let step = tables.employee_workflow_steps.require_mut(step_id)?;
            step.status = update.status;
            if let Some(notes) = update.notes {
                step.notes = Some(notes);
            }
            if update.status == StepStatus::Completed {
                step.completed_on = Some(Utc::now());
                step.completed_by_user_id = update.actor_user_id;
            } else {
                step.completed_on = None;
                step.completed_by_user_id = None;
            }
            let workflow_id = step.employee_workflow_id;

            let states: Vec<StepState> = tables
                .employee_workflow_steps
                .iter()
                .filter(|s| s.employee_workflow_id == workflow_id)
                .map(|s| StepState {
                    status: s.status,
                    is_mandatory: tables
                        .workflow_step_templates
                        .get(s.step_template_id)
                        .is_some_and(|t| t.is_mandatory),
                })
                .collect();

            let workflow = tables.employee_workflows.require_mut(workflow_id)?;
            let next = roll_up_workflow_status(workflow.status, &states);
            if next != workflow.status {
                info!(
                    workflow_id,
                    from = %workflow.status,
                    to = %next,
                    "Workflow status rolled up"
                );
                workflow.status = next;
            }
            let workflow = workflow.clone();
            workflow_view(tables, &workflow)
        })
    }
}

/// Assigns the active template triggered by `status`, if there is one.
///
/// The lowest-id match wins.
pub(crate) fn auto_assign(
    tables: &mut Tables,
    employee_id: i64,
    status: EmploymentStatus,
) -> HrResult<Option<EmployeeWorkflow>> {
    let template_id = tables
        .workflow_templates
        .find(|t| t.is_active && t.auto_assign_on_status == Some(status))
        .map(|t| t.id);

    match template_id {
        Some(template_id) => {
            let workflow = assign(tables, employee_id, template_id, None)?;
            info!(
                employee_id,
                template_id,
                status = %status,
                workflow_id = workflow.id,
                "Auto-assigned workflow"
            );
            Ok(Some(workflow))
        }
        None => {
            debug!(employee_id, status = %status, "No workflow template for status");
            Ok(None)
        }
    }
}

fn assign(
    tables: &mut Tables,
    employee_id: i64,
    template_id: i64,
    due_date: Option<NaiveDate>,
) -> HrResult<EmployeeWorkflow> {
    tables.employees.require(employee_id)?;
    tables.workflow_templates.require(template_id)?;

    if let Some(open) = tables.employee_workflows.find(|w| {
        w.employee_id == employee_id && w.template_id == template_id && w.status.is_open()
    }) {
        return Ok(open.clone());
    }

    let workflow = tables
        .employee_workflows
        .insert_with(|id| EmployeeWorkflow {
            id,
            employee_id,
            template_id,
            assigned_on: Utc::now(),
            due_date,
            status: WorkflowStatus::Pending,
        })
        .clone();

    for step in ordered_steps(tables, template_id) {
        tables
            .employee_workflow_steps
            .insert_with(|id| EmployeeWorkflowStep {
                id,
                employee_workflow_id: workflow.id,
                step_template_id: step.id,
                status: StepStatus::Pending,
                completed_on: None,
                completed_by_user_id: None,
                notes: None,
            });
    }
    Ok(workflow)
}

fn ensure_unique_template(tables: &Tables, name: &str, except: Option<i64>) -> HrResult<()> {
    match tables
        .workflow_templates
        .find(|t| t.name == name && Some(t.id) != except)
    {
        Some(_) => Err(HrError::Duplicate {
            entity: "workflow template",
            field: "name",
            value: name.to_string(),
        }),
        None => Ok(()),
    }
}

fn ordered_steps(tables: &Tables, template_id: i64) -> Vec<WorkflowStepTemplate> {
    let mut steps = tables
        .workflow_step_templates
        .filter_cloned(|s| s.template_id == template_id);
    steps.sort_by_key(|s| (s.order, s.id));
    steps
}

fn template_view(tables: &Tables, id: i64) -> HrResult<TemplateView> {
    let template = tables.workflow_templates.require(id)?.clone();
    Ok(TemplateView {
        steps: ordered_steps(tables, id),
        template,
    })
}

fn workflow_view(tables: &Tables, workflow: &EmployeeWorkflow) -> HrResult<WorkflowView> {
    let template = tables.workflow_templates.require(workflow.template_id)?;
    let mut steps: Vec<StepView> = tables
        .employee_workflow_steps
        .iter()
        .filter(|s| s.employee_workflow_id == workflow.id)
        .filter_map(|s| {
            let step_template = tables.workflow_step_templates.get(s.step_template_id)?;
            Some(StepView {
                step: s.clone(),
                name: step_template.name.clone(),
                order: step_template.order,
                is_mandatory: step_template.is_mandatory,
            })
        })
        .collect();
    steps.sort_by_key(|s| (s.order, s.step.id));

    Ok(WorkflowView {
        workflow: workflow.clone(),
        template_name: template.name.clone(),
        steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::fixture;

    fn onboarding_template(service: &WorkflowService, trigger: Option<EmploymentStatus>) -> TemplateView {
        service
            .create_template(NewWorkflowTemplate {
                name: "New Joiner".to_string(),
                description: None,
                workflow_type: WorkflowType::Onboarding,
                is_active: true,
                auto_assign_on_status: trigger,
                steps: vec![
                    NewStepTemplate {
                        name: "Issue laptop".to_string(),
                        description: None,
                        order: 2,
                        is_mandatory: true,
                    },
                    NewStepTemplate {
                        name: "Sign contract".to_string(),
                        description: None,
                        order: 1,
                        is_mandatory: true,
                    },
                    NewStepTemplate {
                        name: "Team lunch".to_string(),
                        description: None,
                        order: 3,
                        is_mandatory: false,
                    },
                ],
            })
            .unwrap()
    }

    fn complete(actor: i64) -> StepUpdate {
        StepUpdate {
            status: StepStatus::Completed,
            notes: None,
            actor_user_id: Some(actor),
        }
    }

    #[test]
    fn test_template_steps_are_ordered() {
        let fx = fixture();
        let view = onboarding_template(&fx.workflows, None);
        let names: Vec<_> = view.steps.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Sign contract", "Issue laptop", "Team lunch"]);
    }

    #[test]
    fn test_template_names_are_unique() {
        let fx = fixture();
        onboarding_template(&fx.workflows, None);
        let err = fx
            .workflows
            .create_template(NewWorkflowTemplate {
                name: "New Joiner".to_string(),
                description: None,
                workflow_type: WorkflowType::Other,
                is_active: true,
                auto_assign_on_status: None,
                steps: Vec::new(),
            })
            .unwrap_err();
        assert!(matches!(err, HrError::Duplicate { .. }));
    }

    // ==========================================================================
    // WE-001: assignment is idempotent while the workflow is open
    // ==========================================================================
    #[test]
    fn test_we_001_assignment_is_idempotent() {
        let fx = fixture();
        let template = onboarding_template(&fx.workflows, None);

        let first = fx
            .workflows
            .assign_workflow(fx.employee_id, template.template.id, None)
            .unwrap();
        let second = fx
            .workflows
            .assign_workflow(fx.employee_id, template.template.id, None)
            .unwrap();

        assert_eq!(first.workflow.id, second.workflow.id);
        assert_eq!(first.steps.len(), 3);
        assert!(first.steps.iter().all(|s| s.step.status == StepStatus::Pending));
        assert_eq!(first.steps[0].name, "Sign contract");
    }

    #[test]
    fn test_assign_unknown_template_is_not_found() {
        let fx = fixture();
        let err = fx.workflows.assign_workflow(fx.employee_id, 77, None).unwrap_err();
        assert!(matches!(
            err,
            HrError::NotFound {
                entity: "workflow template",
                id: 77
            }
        ));
    }

    // ==========================================================================
    // WE-002: step updates roll up into the workflow
    // ==========================================================================
    #[test]
    fn test_we_002_step_updates_roll_up() {
        let fx = fixture();
        let template = onboarding_template(&fx.workflows, None);
        let view = fx
            .workflows
            .assign_workflow(fx.employee_id, template.template.id, None)
            .unwrap();
        let optional = view.steps[2].step.id;
        let mandatory: Vec<i64> = view.steps[..2].iter().map(|s| s.step.id).collect();

        let view = fx
            .workflows
            .update_employee_workflow_step(optional, complete(fx.manager_user_id))
            .unwrap();
        assert_eq!(view.workflow.status, WorkflowStatus::InProgress);

        let view = fx
            .workflows
            .update_employee_workflow_step(mandatory[0], complete(fx.manager_user_id))
            .unwrap();
        assert_eq!(view.workflow.status, WorkflowStatus::InProgress);
        assert!(view.steps[0].step.completed_on.is_some());
        assert_eq!(view.steps[0].step.completed_by_user_id, Some(fx.manager_user_id));

        let view = fx
            .workflows
            .update_employee_workflow_step(mandatory[1], complete(fx.manager_user_id))
            .unwrap();
        assert_eq!(view.workflow.status, WorkflowStatus::Completed);

        // Reopening a step leaves a completed workflow alone.
        let view = fx
            .workflows
            .update_employee_workflow_step(
                mandatory[1],
                StepUpdate {
                    status: StepStatus::Pending,
                    notes: Some("Laptop returned for repair".to_string()),
                    actor_user_id: None,
                },
            )
            .unwrap();
        assert_eq!(view.workflow.status, WorkflowStatus::Completed);
        let reopened = view.steps.iter().find(|s| s.step.id == mandatory[1]).unwrap();
        assert!(reopened.step.completed_on.is_none());
        assert!(reopened.step.completed_by_user_id.is_none());
        assert_eq!(
            reopened.step.notes.as_deref(),
            Some("Laptop returned for repair")
        );

        // A completed workflow can be assigned again.
        let again = fx
            .workflows
            .assign_workflow(fx.employee_id, template.template.id, None)
            .unwrap();
        assert_ne!(again.workflow.id, view.workflow.id);
    }

    #[test]
    fn test_auto_assign_picks_active_template_for_status() {
        let fx = fixture();
        let template = onboarding_template(&fx.workflows, Some(EmploymentStatus::Resigned));
        fx.workflows
            .update_template(
                template.template.id,
                WorkflowTemplateUpdate {
                    is_active: Some(false),
                    ..WorkflowTemplateUpdate::default()
                },
            )
            .unwrap();

        let store = fx.store.clone();
        let none = store
            .write(|t| auto_assign(t, fx.employee_id, EmploymentStatus::Resigned))
            .unwrap();
        assert!(none.is_none());

        fx.workflows
            .update_template(
                template.template.id,
                WorkflowTemplateUpdate {
                    is_active: Some(true),
                    ..WorkflowTemplateUpdate::default()
                },
            )
            .unwrap();
        let assigned = store
            .write(|t| auto_assign(t, fx.employee_id, EmploymentStatus::Resigned))
            .unwrap();
        assert_eq!(assigned.unwrap().template_id, template.template.id);
    }

    #[test]
    fn test_list_templates_filters() {
        let fx = fixture();
        onboarding_template(&fx.workflows, None);
        let onboarding = fx.workflows.list_templates(TemplateFilter {
            workflow_type: Some(WorkflowType::Onboarding),
            is_active: None,
        });
        let offboarding = fx.workflows.list_templates(TemplateFilter {
            workflow_type: Some(WorkflowType::Offboarding),
            is_active: None,
        });
        assert_eq!(onboarding.len(), 1);
        assert!(offboarding.is_empty());
    }
}

//! Goals, appraisal cycles and performance reviews.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{HrError, HrResult};
use crate::models::{
    AppraisalCycle, AppraisalCycleStatus, Goal, GoalStatus, PerformanceReview, ReviewStatus,
};
use crate::store::{HrStore, Tables};

/// A new goal.
#[derive(Debug, Clone, Deserialize)]
pub struct NewGoal {
    /// Goal owner.
    pub employee_id: i64,
    /// Cycle the goal counts towards.
    #[serde(default)]
    pub appraisal_cycle_id: Option<i64>,
    /// Short title.
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// How success is measured.
    #[serde(default)]
    pub key_performance_indicator: Option<String>,
    /// Target to reach.
    #[serde(default)]
    pub target_value: Option<String>,
    /// Start date.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Due date.
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Initial status; not started when absent.
    #[serde(default)]
    pub status: Option<GoalStatus>,
    /// Weight within the cycle, 0 to 100.
    #[serde(default)]
    pub weightage: Option<Decimal>,
}

/// Partial update of a goal.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GoalUpdate {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New measure.
    pub key_performance_indicator: Option<String>,
    /// New target.
    pub target_value: Option<String>,
    /// New start date.
    pub start_date: Option<NaiveDate>,
    /// New due date.
    pub due_date: Option<NaiveDate>,
    /// New status.
    pub status: Option<GoalStatus>,
    /// New weight.
    pub weightage: Option<Decimal>,
}

/// A new appraisal cycle.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAppraisalCycle {
    /// Unique name.
    pub name: String,
    /// First day of the cycle.
    pub start_date: NaiveDate,
    /// Last day of the cycle.
    pub end_date: NaiveDate,
    /// Start of the feedback window.
    #[serde(default)]
    pub feedback_start_date: Option<NaiveDate>,
    /// End of the feedback window.
    #[serde(default)]
    pub feedback_end_date: Option<NaiveDate>,
    /// Initial status; draft when absent.
    #[serde(default)]
    pub status: Option<AppraisalCycleStatus>,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Partial update of an appraisal cycle.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppraisalCycleUpdate {
    /// New name.
    pub name: Option<String>,
    /// New first day.
    pub start_date: Option<NaiveDate>,
    /// New last day.
    pub end_date: Option<NaiveDate>,
    /// New feedback window start.
    pub feedback_start_date: Option<NaiveDate>,
    /// New feedback window end.
    pub feedback_end_date: Option<NaiveDate>,
    /// New status.
    pub status: Option<AppraisalCycleStatus>,
    /// New description.
    pub description: Option<String>,
}

/// An employee's self-evaluation.
#[derive(Debug, Clone, Deserialize)]
pub struct SelfEvaluation {
    /// Must be the reviewed employee.
    pub employee_id: i64,
    /// Evaluation text.
    #[serde(default)]
    pub text: Option<String>,
    /// Rating from 1 to 5.
    #[serde(default)]
    pub rating: Option<Decimal>,
}

/// A manager's feedback on a review.
#[derive(Debug, Clone, Deserialize)]
pub struct ManagerFeedback {
    /// Must be the reviewing manager.
    pub manager_id: i64,
    /// Feedback text.
    #[serde(default)]
    pub text: Option<String>,
    /// Rating from 1 to 5.
    #[serde(default)]
    pub rating: Option<Decimal>,
}

/// Result of initiating reviews for a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewInitiation {
    /// Reviews created by this call.
    pub initiated: usize,
    /// Every review of the requested employees, new or existing.
    pub reviews: Vec<PerformanceReview>,
}

/// Performance operations over the shared store.
#[derive(Debug, Clone)]
pub struct PerformanceService {
    store: HrStore,
}

impl PerformanceService {
    /// Creates the service.
    pub fn new(store: HrStore) -> Self {
        Self { store }
    }

    // ------------------------------------------------------------------
    // Goals
    // ------------------------------------------------------------------

    /// Creates a goal. A referenced cycle must still accept goals.
    pub fn create_goal(&self, new: NewGoal) -> HrResult<Goal> {
        let title = non_empty("title", &new.title)?;
        check_weightage(new.weightage)?;
        check_range("due_date", new.start_date, new.due_date)?;

        self.store.write(|tables| {
            tables.employees.require(new.employee_id)?;
            if let Some(cycle_id) = new.appraisal_cycle_id {
                let cycle = tables.appraisal_cycles.require(cycle_id)?;
                if !cycle.status.accepts_goals() {
                    return Err(HrError::rule(format!(
                        "Cannot add goals to a cycle with status {}",
                        cycle.status
                    )));
                }
            }
            Ok(tables
                .goals
                .insert_with(|id| Goal {
                    id,
                    employee_id: new.employee_id,
                    appraisal_cycle_id: new.appraisal_cycle_id,
                    title,
                    description: new.description,
                    key_performance_indicator: new.key_performance_indicator,
                    target_value: new.target_value,
                    start_date: new.start_date,
                    due_date: new.due_date,
                    status: new.status.unwrap_or_default(),
                    weightage: new.weightage,
                })
                .clone())
        })
    }

    /// Fetches one goal.
    pub fn get_goal(&self, id: i64) -> HrResult<Goal> {
        self.store.read(|tables| tables.goals.require(id).cloned())
    }

    /// Lists an employee's goals, optionally for one cycle.
    pub fn list_goals(&self, employee_id: i64, cycle_id: Option<i64>) -> HrResult<Vec<Goal>> {
        self.store.read(|tables| {
            tables.employees.require(employee_id)?;
            Ok(tables.goals.filter_cloned(|g| {
                g.employee_id == employee_id && cycle_id.is_none_or(|c| g.appraisal_cycle_id == Some(c))
            }))
        })
    }

    /// Lists the goals of a manager's direct reports.
    pub fn list_team_goals(&self, manager_id: i64, cycle_id: Option<i64>) -> HrResult<Vec<Goal>> {
        self.store.read(|tables| {
            tables.employees.require(manager_id)?;
            Ok(tables.goals.filter_cloned(|g| {
                tables
                    .employees
                    .get(g.employee_id)
                    .is_some_and(|e| e.manager_id == Some(manager_id))
                    && cycle_id.is_none_or(|c| g.appraisal_cycle_id == Some(c))
            }))
        })
    }

    /// Applies a partial update to a goal.
    pub fn update_goal(&self, id: i64, update: GoalUpdate) -> HrResult<Goal> {
        check_weightage(update.weightage)?;
        let title = update
            .title
            .as_deref()
            .map(|t| non_empty("title", t))
            .transpose()?;

        self.store.write(|tables| {
            let goal = tables.goals.require_mut(id)?;
            let start_date = update.start_date.or(goal.start_date);
            let due_date = update.due_date.or(goal.due_date);
            check_range("due_date", start_date, due_date)?;

            if let Some(title) = title {
                goal.title = title;
            }
            if let Some(description) = update.description {
                goal.description = Some(description);
            }
            if let Some(kpi) = update.key_performance_indicator {
                goal.key_performance_indicator = Some(kpi);
            }
            if let Some(target) = update.target_value {
                goal.target_value = Some(target);
            }
            goal.start_date = start_date;
            goal.due_date = due_date;
            if let Some(status) = update.status {
                goal.status = status;
            }
            if let Some(weightage) = update.weightage {
                goal.weightage = Some(weightage);
            }
            Ok(goal.clone())
        })
    }

    /// Deletes a goal.
    pub fn delete_goal(&self, id: i64) -> HrResult<()> {
        self.store.write(|tables| {
            tables.goals.require(id)?;
            tables.goals.remove(id);
            Ok(())
        })
    }

    // ------------------------------------------------------------------
    // Cycles
    // ------------------------------------------------------------------

    /// Creates an appraisal cycle with a unique name.
    pub fn create_cycle(&self, new: NewAppraisalCycle) -> HrResult<AppraisalCycle> {
        let name = non_empty("name", &new.name)?;
        check_range("end_date", Some(new.start_date), Some(new.end_date))?;
        check_range("feedback_end_date", new.feedback_start_date, new.feedback_end_date)?;

        self.store.write(|tables| {
            ensure_unique_cycle(tables, &name, None)?;
            Ok(tables
                .appraisal_cycles
                .insert_with(|id| AppraisalCycle {
                    id,
                    name,
                    start_date: new.start_date,
                    end_date: new.end_date,
                    feedback_start_date: new.feedback_start_date,
                    feedback_end_date: new.feedback_end_date,
                    status: new.status.unwrap_or(AppraisalCycleStatus::Draft),
                    description: new.description,
                })
                .clone())
        })
    }

    /// Fetches one cycle.
    pub fn get_cycle(&self, id: i64) -> HrResult<AppraisalCycle> {
        self.store
            .read(|tables| tables.appraisal_cycles.require(id).cloned())
    }

    /// Lists cycles, optionally by status.
    pub fn list_cycles(&self, status: Option<AppraisalCycleStatus>) -> Vec<AppraisalCycle> {
        self.store.read(|tables| {
            tables
                .appraisal_cycles
                .filter_cloned(|c| status.is_none_or(|s| c.status == s))
        })
    }

    /// Applies a partial update to a cycle.
    pub fn update_cycle(&self, id: i64, update: AppraisalCycleUpdate) -> HrResult<AppraisalCycle> {
        let name = update
            .name
            .as_deref()
            .map(|n| non_empty("name", n))
            .transpose()?;

        self.store.write(|tables| {
            let current = tables.appraisal_cycles.require(id)?.clone();
            if let Some(name) = &name {
                ensure_unique_cycle(tables, name, Some(id))?;
            }
            let start_date = update.start_date.unwrap_or(current.start_date);
            let end_date = update.end_date.unwrap_or(current.end_date);
            let feedback_start = update.feedback_start_date.or(current.feedback_start_date);
            let feedback_end = update.feedback_end_date.or(current.feedback_end_date);
            check_range("end_date", Some(start_date), Some(end_date))?;
            check_range("feedback_end_date", feedback_start, feedback_end)?;

            let cycle = tables.appraisal_cycles.require_mut(id)?;
            if let Some(name) = name {
                cycle.name = name;
            }
            cycle.start_date = start_date;
            cycle.end_date = end_date;
            cycle.feedback_start_date = feedback_start;
            cycle.feedback_end_date = feedback_end;
            if let Some(status) = update.status {
                cycle.status = status;
            }
            if let Some(description) = update.description {
                cycle.description = Some(description);
            }
            Ok(cycle.clone())
        })
    }

    // ------------------------------------------------------------------
    // Reviews
    // ------------------------------------------------------------------

    /// Creates a review per employee for an active cycle.
    ///
    /// Employees that do not exist or have no manager are skipped; an
    /// existing review for the cycle is returned instead of a new one.
    pub fn initiate_reviews(&self, cycle_id: i64, employee_ids: &[i64]) -> HrResult<ReviewInitiation> {
        self.store.write(|tables| {
            let cycle = tables.appraisal_cycles.require(cycle_id)?;
            if cycle.status != AppraisalCycleStatus::Active {
                return Err(HrError::rule(format!(
                    "Cannot initiate reviews for cycle with status {}.",
                    cycle.status
                )));
            }

            let mut initiated = 0;
            let mut reviews = Vec::new();
            for &employee_id in employee_ids {
                let Some(manager_id) = tables.employees.get(employee_id).and_then(|e| e.manager_id)
                else {
                    continue;
                };
                if let Some(existing) = tables
                    .performance_reviews
                    .find(|r| r.appraisal_cycle_id == cycle_id && r.employee_id == employee_id)
                {
                    reviews.push(existing.clone());
                    continue;
                }
                let review = tables
                    .performance_reviews
                    .insert_with(|id| PerformanceReview {
                        id,
                        appraisal_cycle_id: cycle_id,
                        employee_id,
                        manager_id,
                        self_evaluation_text: None,
                        self_evaluation_rating: None,
                        self_evaluation_submitted_on: None,
                        manager_feedback_text: None,
                        manager_rating: None,
                        manager_feedback_submitted_on: None,
                        review_status: ReviewStatus::default(),
                    })
                    .clone();
                initiated += 1;
                reviews.push(review);
            }

            info!(cycle_id, initiated, "Performance reviews initiated");
            Ok(ReviewInitiation { initiated, reviews })
        })
    }

    /// Fetches one review.
    pub fn get_review(&self, id: i64) -> HrResult<PerformanceReview> {
        self.store
            .read(|tables| tables.performance_reviews.require(id).cloned())
    }

    /// Lists a cycle's reviews, optionally only those of one manager.
    pub fn list_reviews(
        &self,
        cycle_id: i64,
        manager_id: Option<i64>,
    ) -> HrResult<Vec<PerformanceReview>> {
        self.store.read(|tables| {
            tables.appraisal_cycles.require(cycle_id)?;
            Ok(tables.performance_reviews.filter_cloned(|r| {
                r.appraisal_cycle_id == cycle_id && manager_id.is_none_or(|m| r.manager_id == m)
            }))
        })
    }

    /// Records the reviewed employee's self-evaluation.
    pub fn submit_self_evaluation(
        &self,
        review_id: i64,
        evaluation: SelfEvaluation,
    ) -> HrResult<PerformanceReview> {
        check_rating("rating", evaluation.rating)?;
        self.store.write(|tables| {
            let review = tables.performance_reviews.require_mut(review_id)?;
            if review.employee_id != evaluation.employee_id {
                return Err(HrError::Forbidden {
                    message: "Not authorized to submit self-evaluation for this review.".to_string(),
                });
            }
            advance(review, ReviewStatus::PendingManagerFeedback, "self-evaluation")?;
            review.self_evaluation_text = evaluation.text;
            review.self_evaluation_rating = evaluation.rating;
            review.self_evaluation_submitted_on = Some(Utc::now());
            Ok(review.clone())
        })
    }

    /// Records the reviewing manager's feedback.
    pub fn submit_manager_feedback(
        &self,
        review_id: i64,
        feedback: ManagerFeedback,
    ) -> HrResult<PerformanceReview> {
        check_rating("rating", feedback.rating)?;
        self.store.write(|tables| {
            let review = tables.performance_reviews.require_mut(review_id)?;
            if review.manager_id != feedback.manager_id {
                return Err(HrError::Forbidden {
                    message: "Not authorized to submit manager feedback for this review.".to_string(),
                });
            }
            advance(review, ReviewStatus::PendingDiscussion, "manager feedback")?;
            review.manager_feedback_text = feedback.text;
            review.manager_rating = feedback.rating;
            review.manager_feedback_submitted_on = Some(Utc::now());
            Ok(review.clone())
        })
    }

    /// Sets a review status directly. Submissions go through
    /// [`Self::submit_self_evaluation`] and [`Self::submit_manager_feedback`].
    pub fn update_review_status(
        &self,
        review_id: i64,
        status: ReviewStatus,
    ) -> HrResult<PerformanceReview> {
        self.store.write(|tables| {
            let review = tables.performance_reviews.require_mut(review_id)?;
            if !review.review_status.can_be_set_manually(status) {
                return Err(HrError::InvalidTransition {
                    entity: "performance review",
                    from: review.review_status.to_string(),
                    to: status.to_string(),
                });
            }
            review.review_status = status;
            Ok(review.clone())
        })
    }
}

fn advance(review: &mut PerformanceReview, next: ReviewStatus, what: &str) -> HrResult<()> {
    if !review.review_status.can_transition_to(next) {
        return Err(HrError::rule(format!(
            "Cannot submit {what} when review status is {}",
            review.review_status
        )));
    }
    review.review_status = next;
    Ok(())
}

fn non_empty(field: &str, value: &str) -> HrResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(HrError::validation(field, "must not be empty"));
    }
    Ok(trimmed.to_string())
}

fn check_range(field: &str, start: Option<NaiveDate>, end: Option<NaiveDate>) -> HrResult<()> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(HrError::validation(
            field,
            format!("{end} is before {start}"),
        )),
        _ => Ok(()),
    }
}

fn check_weightage(weightage: Option<Decimal>) -> HrResult<()> {
    match weightage {
        Some(w) if w < Decimal::ZERO || w > Decimal::ONE_HUNDRED => {
            Err(HrError::validation("weightage", "must be between 0 and 100"))
        }
        _ => Ok(()),
    }
}

fn check_rating(field: &str, rating: Option<Decimal>) -> HrResult<()> {
    match rating {
        Some(r) if r < Decimal::ONE || r > Decimal::from(5) => {
            Err(HrError::validation(field, "must be between 1 and 5"))
        }
        _ => Ok(()),
    }
}

fn ensure_unique_cycle(tables: &Tables, name: &str, except: Option<i64>) -> HrResult<()> {
    match tables
        .appraisal_cycles
        .find(|c| c.name == name && Some(c.id) != except)
    {
        Some(_) => Err(HrError::Duplicate {
            entity: "appraisal cycle",
            field: "name",
            value: name.to_string(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{date, dec, fixture, Fixture};

    fn cycle(fx: &Fixture, status: AppraisalCycleStatus) -> AppraisalCycle {
        fx.performance
            .create_cycle(NewAppraisalCycle {
                name: "FY 2026".to_string(),
                start_date: date(2026, 4, 1),
                end_date: date(2027, 3, 31),
                feedback_start_date: None,
                feedback_end_date: None,
                status: Some(status),
                description: None,
            })
            .unwrap()
    }

    fn goal(employee_id: i64, cycle_id: Option<i64>) -> NewGoal {
        NewGoal {
            employee_id,
            appraisal_cycle_id: cycle_id,
            title: "Ship payroll v2".to_string(),
            description: None,
            key_performance_indicator: None,
            target_value: None,
            start_date: None,
            due_date: None,
            status: None,
            weightage: Some(dec("40")),
        }
    }

    #[test]
    fn test_goal_rules() {
        let fx = fixture();
        let open = cycle(&fx, AppraisalCycleStatus::Active);
        let created = fx
            .performance
            .create_goal(goal(fx.employee_id, Some(open.id)))
            .unwrap();
        assert_eq!(created.status, GoalStatus::NotStarted);

        let err = fx
            .performance
            .create_goal(NewGoal {
                weightage: Some(dec("101")),
                ..goal(fx.employee_id, None)
            })
            .unwrap_err();
        assert!(matches!(err, HrError::Validation { .. }));

        fx.performance
            .update_cycle(
                open.id,
                AppraisalCycleUpdate {
                    status: Some(AppraisalCycleStatus::Closed),
                    ..AppraisalCycleUpdate::default()
                },
            )
            .unwrap();
        let err = fx
            .performance
            .create_goal(goal(fx.employee_id, Some(open.id)))
            .unwrap_err();
        assert_eq!(err.to_string(), "Cannot add goals to a cycle with status closed");

        let team = fx.performance.list_team_goals(fx.manager_id, None).unwrap();
        assert_eq!(team.len(), 1);
    }

    #[test]
    fn test_cycle_dates_and_names() {
        let fx = fixture();
        cycle(&fx, AppraisalCycleStatus::Draft);
        let err = fx
            .performance
            .create_cycle(NewAppraisalCycle {
                name: "FY 2026".to_string(),
                start_date: date(2026, 4, 1),
                end_date: date(2027, 3, 31),
                feedback_start_date: None,
                feedback_end_date: None,
                status: None,
                description: None,
            })
            .unwrap_err();
        assert!(matches!(err, HrError::Duplicate { .. }));

        let err = fx
            .performance
            .create_cycle(NewAppraisalCycle {
                name: "Backwards".to_string(),
                start_date: date(2026, 4, 1),
                end_date: date(2026, 3, 31),
                feedback_start_date: None,
                feedback_end_date: None,
                status: None,
                description: None,
            })
            .unwrap_err();
        assert!(matches!(err, HrError::Validation { .. }));
    }

    // ==========================================================================
    // RV-001: review flow from initiation to completion
    // ==========================================================================
    #[test]
    fn test_rv_001_review_flow() {
        let fx = fixture();
        let draft = cycle(&fx, AppraisalCycleStatus::Draft);
        let err = fx
            .performance
            .initiate_reviews(draft.id, &[fx.employee_id])
            .unwrap_err();
        assert!(matches!(err, HrError::BusinessRule { .. }));

        fx.performance
            .update_cycle(
                draft.id,
                AppraisalCycleUpdate {
                    status: Some(AppraisalCycleStatus::Active),
                    ..AppraisalCycleUpdate::default()
                },
            )
            .unwrap();

        // The manager has no manager of their own and is skipped.
        let started = fx
            .performance
            .initiate_reviews(draft.id, &[fx.employee_id, fx.manager_id])
            .unwrap();
        assert_eq!(started.initiated, 1);
        let review = started.reviews[0].clone();
        assert_eq!(review.manager_id, fx.manager_id);

        let again = fx
            .performance
            .initiate_reviews(draft.id, &[fx.employee_id])
            .unwrap();
        assert_eq!(again.initiated, 0);
        assert_eq!(again.reviews[0].id, review.id);

        let err = fx
            .performance
            .submit_manager_feedback(
                review.id,
                ManagerFeedback {
                    manager_id: fx.manager_id,
                    text: None,
                    rating: Some(dec("4")),
                },
            )
            .unwrap_err();
        assert!(matches!(err, HrError::BusinessRule { .. }));

        let err = fx
            .performance
            .submit_self_evaluation(
                review.id,
                SelfEvaluation {
                    employee_id: fx.manager_id,
                    text: None,
                    rating: None,
                },
            )
            .unwrap_err();
        assert!(matches!(err, HrError::Forbidden { .. }));

        let review = fx
            .performance
            .submit_self_evaluation(
                review.id,
                SelfEvaluation {
                    employee_id: fx.employee_id,
                    text: Some("Delivered the leave module".to_string()),
                    rating: Some(dec("4.5")),
                },
            )
            .unwrap();
        assert_eq!(review.review_status, ReviewStatus::PendingManagerFeedback);
        assert!(review.self_evaluation_submitted_on.is_some());

        let review = fx
            .performance
            .submit_manager_feedback(
                review.id,
                ManagerFeedback {
                    manager_id: fx.manager_id,
                    text: Some("Strong year".to_string()),
                    rating: Some(dec("4")),
                },
            )
            .unwrap();
        assert_eq!(review.review_status, ReviewStatus::PendingDiscussion);

        let review = fx
            .performance
            .update_review_status(review.id, ReviewStatus::Completed)
            .unwrap();
        assert_eq!(review.review_status, ReviewStatus::Completed);

        let err = fx
            .performance
            .submit_self_evaluation(
                review.id,
                SelfEvaluation {
                    employee_id: fx.employee_id,
                    text: None,
                    rating: None,
                },
            )
            .unwrap_err();
        assert!(matches!(err, HrError::BusinessRule { .. }));

        let err = fx
            .performance
            .update_review_status(review.id, ReviewStatus::PendingDiscussion)
            .unwrap_err();
        assert!(matches!(err, HrError::InvalidTransition { .. }));
    }

    #[test]
    fn test_manual_status_cannot_skip_submissions() {
        let fx = fixture();
        let open = cycle(&fx, AppraisalCycleStatus::Active);
        let review = fx
            .performance
            .initiate_reviews(open.id, &[fx.employee_id])
            .unwrap()
            .reviews[0]
            .clone();

        for status in [
            ReviewStatus::PendingManagerFeedback,
            ReviewStatus::PendingDiscussion,
            ReviewStatus::Completed,
        ] {
            let err = fx
                .performance
                .update_review_status(review.id, status)
                .unwrap_err();
            assert!(matches!(err, HrError::InvalidTransition { .. }));
        }

        let review = fx
            .performance
            .submit_self_evaluation(
                review.id,
                SelfEvaluation {
                    employee_id: fx.employee_id,
                    text: None,
                    rating: None,
                },
            )
            .unwrap();
        let err = fx
            .performance
            .update_review_status(review.id, ReviewStatus::PendingDiscussion)
            .unwrap_err();
        assert!(matches!(err, HrError::InvalidTransition { .. }));
        assert_eq!(
            fx.performance.get_review(review.id).unwrap().review_status,
            ReviewStatus::PendingManagerFeedback
        );
    }

    #[test]
    fn test_ratings_are_bounded() {
        let fx = fixture();
        let err = fx
            .performance
            .submit_self_evaluation(
                1,
                SelfEvaluation {
                    employee_id: fx.employee_id,
                    text: None,
                    rating: Some(dec("6")),
                },
            )
            .unwrap_err();
        assert!(matches!(err, HrError::Validation { .. }));
    }
}

use chrono::DateTime;
use chrono::Utc;

use crate::domain::article::errors::ArticleError;
use crate::domain::article::models::ArticleStatus;

/// Outcome of a status change: the new status and publish date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub status: ArticleStatus,
    pub published_at: Option<DateTime<Utc>>,
}

/// Decide the status and publish date an article moves to.
///
/// The single rule shared by create, full update and status update. A new
/// article is evaluated as a transition out of `draft` with no publish date.
///
/// * Published or archived articles never go back to `draft` or `scheduled`.
/// * `scheduled` needs a publish date; a scheduled article keeps its date
///   when no new one is given.
/// * Entering `published` from `draft` or `scheduled` stamps `now`; an
///   archived article keeps its original date.
/// * Everything else leaves the publish date untouched.
///
/// # Errors
/// * `InvalidStatusTransition` - Published/archived back to draft/scheduled
/// * `PublishDateRequired` - Scheduling without a date
pub fn evaluate_transition(
    current: ArticleStatus,
    current_published_at: Option<DateTime<Utc>>,
    target: ArticleStatus,
    publish_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<StatusChange, ArticleError> {
    use ArticleStatus::*;

    let published_at = match (current, target) {
        (Published | Archived, Draft | Scheduled) => {
            return Err(ArticleError::InvalidStatusTransition {
                from: current,
                to: target,
            })
        }
        (Scheduled, Scheduled) => Some(
            publish_at
                .or(current_published_at)
                .ok_or(ArticleError::PublishDateRequired)?,
        ),
        (_, Scheduled) => Some(publish_at.ok_or(ArticleError::PublishDateRequired)?),
        (Draft | Scheduled, Published) => Some(now),
        (Archived, Published) => Some(current_published_at.unwrap_or(now)),
        _ => current_published_at,
    };

    Ok(StatusChange {
        status: target,
        published_at,
    })
}

/// Status and publish date for a brand new article.
pub fn initial_status(
    target: ArticleStatus,
    publish_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<StatusChange, ArticleError> {
    evaluate_transition(ArticleStatus::Draft, None, target, publish_at, now)
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use ArticleStatus::*;

    #[test]
    fn test_draft_to_published_stamps_now() {
        let now = Utc::now();
        let change = evaluate_transition(Draft, None, Published, None, now).unwrap();

        assert_eq!(change.status, Published);
        assert_eq!(change.published_at, Some(now));
    }

    #[test]
    fn test_scheduled_requires_date() {
        let now = Utc::now();

        assert!(matches!(
            initial_status(Scheduled, None, now),
            Err(ArticleError::PublishDateRequired)
        ));

        let at = now + Duration::days(2);
        let change = initial_status(Scheduled, Some(at), now).unwrap();
        assert_eq!(change.published_at, Some(at));
    }

    #[test]
    fn test_scheduled_then_published_uses_now() {
        let now = Utc::now();
        let at = now + Duration::days(2);

        let change = evaluate_transition(Scheduled, Some(at), Published, None, now).unwrap();

        assert_eq!(change.published_at, Some(now));
    }

    #[test]
    fn test_rescheduling_keeps_or_replaces_date() {
        let now = Utc::now();
        let first = now + Duration::days(1);
        let second = now + Duration::days(5);

        let kept = evaluate_transition(Scheduled, Some(first), Scheduled, None, now).unwrap();
        assert_eq!(kept.published_at, Some(first));

        let moved =
            evaluate_transition(Scheduled, Some(first), Scheduled, Some(second), now).unwrap();
        assert_eq!(moved.published_at, Some(second));
    }

    #[test]
    fn test_no_way_back_to_draft() {
        let now = Utc::now();
        for from in [Published, Archived] {
            for to in [Draft, Scheduled] {
                let result = evaluate_transition(from, Some(now), to, Some(now), now);
                assert!(
                    matches!(result, Err(ArticleError::InvalidStatusTransition { .. })),
                    "{from} -> {to} should be rejected"
                );
            }
        }
    }

    #[test]
    fn test_archive_keeps_publish_date() {
        let now = Utc::now();
        let published = now - Duration::days(10);

        let archived = evaluate_transition(Published, Some(published), Archived, None, now).unwrap();
        assert_eq!(archived.published_at, Some(published));

        let restored =
            evaluate_transition(Archived, Some(published), Published, None, now).unwrap();
        assert_eq!(restored.published_at, Some(published));
    }

    #[test]
    fn test_republishing_keeps_original_date() {
        let now = Utc::now();
        let published = now - Duration::days(3);

        let change =
            evaluate_transition(Published, Some(published), Published, None, now).unwrap();
        assert_eq!(change.published_at, Some(published));
    }
}

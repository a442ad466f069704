use tracing::{info, warn};

use crate::database::RosterStore;
use crate::error::RosterError;

/// Result of an applied signup or unregister.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationReceipt {
    pub message: String,
}

pub async fn signup(
    store: &RosterStore,
    activity_name: &str,
    email: &str,
) -> Result<MutationReceipt, RosterError> {
    validate_activity_name(activity_name)?;
    validate_email(email)?;

    match store.add_participant(activity_name, email).await {
        Ok(()) => {
            info!(activity = %activity_name, email = %email, "signup applied");
            Ok(MutationReceipt {
                message: format!("Signed up {} for {}", email, activity_name),
            })
        }
        Err(e) => {
            warn!(activity = %activity_name, "Signup command failed: {}", e);
            Err(e)
        }
    }
}

pub async fn unregister(
    store: &RosterStore,
    activity_name: &str,
    email: &str,
) -> Result<MutationReceipt, RosterError> {
    validate_activity_name(activity_name)?;

    match store.remove_participant(activity_name, email).await {
        Ok(()) => {
            info!(activity = %activity_name, email = %email, "unregister applied");
            Ok(MutationReceipt {
                message: format!("Unregistered {} from {}", email, activity_name),
            })
        }
        Err(e) => {
            warn!(activity = %activity_name, "Unregister command failed: {}", e);
            Err(e)
        }
    }
}

fn validate_activity_name(activity_name: &str) -> Result<(), RosterError> {
    if activity_name.trim().is_empty() {
        return Err(RosterError::MalformedInput(
            "activity name is required".to_string(),
        ));
    }
    Ok(())
}

// Anything printable is accepted; markup in an address is stored verbatim
// and escaped when rendered.
fn validate_email(email: &str) -> Result<(), RosterError> {
    if email.trim().is_empty() {
        return Err(RosterError::MalformedInput("email is required".to_string()));
    }
    if email.chars().any(char::is_control) {
        return Err(RosterError::MalformedInput(
            "email must not contain control characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityView, RosterSnapshot};
    use crate::services::seed_service::default_seed;

    async fn chess_club(max: u32) -> RosterStore {
        let mut seed = RosterSnapshot::new();
        seed.insert(
            "Chess Club".to_string(),
            ActivityView {
                description: "Learn strategies and compete in chess tournaments".to_string(),
                schedule: "Fridays, 3:30 PM - 5:00 PM".to_string(),
                max_participants: max,
                participants: vec![],
            },
        );
        RosterStore::open("sqlite::memory:", &seed).await.unwrap()
    }

    #[tokio::test]
    async fn chess_club_scenario() {
        let store = chess_club(2).await;

        let receipt = signup(&store, "Chess Club", "a@x.com").await.unwrap();
        assert_eq!(receipt.message, "Signed up a@x.com for Chess Club");
        assert_eq!(store.get_activity("Chess Club").await.unwrap().spots_left(), 1);

        signup(&store, "Chess Club", "b@x.com").await.unwrap();
        assert_eq!(store.get_activity("Chess Club").await.unwrap().spots_left(), 0);

        let err = signup(&store, "Chess Club", "c@x.com").await.unwrap_err();
        assert!(matches!(err, RosterError::Full));
        assert!(err.to_string().to_lowercase().contains("full"));

        let receipt = unregister(&store, "Chess Club", "a@x.com").await.unwrap();
        assert_eq!(receipt.message, "Unregistered a@x.com from Chess Club");
        assert_eq!(store.get_activity("Chess Club").await.unwrap().spots_left(), 1);
    }

    #[tokio::test]
    async fn repeated_failures_are_deterministic() {
        let store = RosterStore::open("sqlite::memory:", &default_seed())
            .await
            .unwrap();
        for _ in 0..3 {
            let err = signup(&store, "Chess Club", "michael@mergington.edu")
                .await
                .unwrap_err();
            assert!(err.to_string().contains("already signed up"));

            let err = unregister(&store, "Chess Club", "nobody@mergington.edu")
                .await
                .unwrap_err();
            assert!(err.to_string().contains("not signed up"));
        }
        let chess = store.get_activity("Chess Club").await.unwrap();
        assert_eq!(chess.view.participants.len(), 2);
    }

    #[tokio::test]
    async fn rejects_blank_or_control_character_input() {
        let store = chess_club(5).await;
        for email in ["", "   ", "a@x.com\n", "a\u{0}@x.com"] {
            let err = signup(&store, "Chess Club", email).await.unwrap_err();
            assert!(matches!(err, RosterError::MalformedInput(_)), "{email:?}");
        }
        assert!(matches!(
            signup(&store, " ", "a@x.com").await,
            Err(RosterError::MalformedInput(_))
        ));
        assert!(store
            .get_activity("Chess Club")
            .await
            .unwrap()
            .view
            .participants
            .is_empty());
    }

    #[tokio::test]
    async fn markup_in_email_is_stored_verbatim() {
        let store = chess_club(5).await;
        let email = r#"test'"><script>alert("xss")</script>@evil.com"#;
        signup(&store, "Chess Club", email).await.unwrap();

        let chess = store.get_activity("Chess Club").await.unwrap();
        assert_eq!(chess.view.participants, vec![email]);
    }

    #[tokio::test]
    async fn signup_unregister_signup_cycle() {
        let store = chess_club(5).await;
        signup(&store, "Chess Club", "a@x.com").await.unwrap();
        unregister(&store, "Chess Club", "a@x.com").await.unwrap();
        signup(&store, "Chess Club", "a@x.com").await.unwrap();

        let roster = store.list_activities().await.unwrap();
        let hits = roster["Chess Club"]
            .participants
            .iter()
            .filter(|p| *p == "a@x.com")
            .count();
        assert_eq!(hits, 1);
    }
}

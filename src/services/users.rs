//! User table and profile service.
//!
//! ARCHITECTURE
//! ============
//! `UserRepository` is the persistence seam. The only implementation keeps
//! records in memory, seeded from a fixed directory at startup; registration
//! appends and profile edits mutate in place. Nothing is ever deleted.
//!
//! `UserService` is what dashboards and profile pages call. It resolves the
//! viewer from the id embedded in mock access tokens and shapes records
//! into the role-specific views.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::services::mock_auth::token_user_id;
use crate::types::{Role, Session};

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("User not found")]
    NotFound(u64),
    #[error("User already exists")]
    EmailTaken(String),
}

// =============================================================================
// RECORDS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub email_notifications: bool,
    pub sms_notifications: bool,
    pub marketing_emails: bool,
    pub two_factor_auth: bool,
    pub dark_mode: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnerDetails {
    pub enrolled_courses: u32,
    pub completed_courses: u32,
    pub certificates_earned: u32,
    pub average_grade: f64,
    pub interests: Vec<String>,
    pub current_goals: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Ratings {
    pub average: f64,
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorDetails {
    pub courses_created: u32,
    pub students_count: u32,
    pub specializations: Vec<String>,
    pub ratings: Ratings,
    pub education: Vec<String>,
    pub experience: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDetails {
    pub department: String,
    pub admin_since: String,
    pub permissions: Vec<String>,
    pub managed_areas: Vec<String>,
}

/// Role-specific profile extension, flattened into the record when serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RoleDetails {
    Learner(LearnerDetails),
    Tutor(TutorDetails),
    Admin(AdminDetails),
}

impl RoleDetails {
    /// Empty extension for a freshly registered user.
    #[must_use]
    pub fn blank(role: Role) -> Self {
        match role {
            Role::Learner => Self::Learner(LearnerDetails::default()),
            Role::Tutor => Self::Tutor(TutorDetails::default()),
            Role::Admin => Self::Admin(AdminDetails::default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: u64,
    pub email: String,
    /// Plaintext in the mock table. `None` for directory-only users who
    /// cannot log in.
    #[serde(skip)]
    pub password: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub profile_image: Option<String>,
    pub bio: Option<String>,
    pub joined: String,
    pub last_active: String,
    pub location: Option<String>,
    pub social_links: SocialLinks,
    pub preferences: Preferences,
    #[serde(flatten)]
    pub details: RoleDetails,
}

impl UserRecord {
    #[must_use]
    pub fn session(&self) -> Session {
        Session {
            user_id: self.id,
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            role: self.role,
        }
    }

    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.first_name.to_lowercase().contains(&query)
            || self.last_name.to_lowercase().contains(&query)
            || self.email.to_lowercase().contains(&query)
    }
}

/// Input for appending a user. The id is assigned by the repository.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub joined: String,
}

/// Partial profile edit. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub social_links: Option<SocialLinks>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesPatch {
    pub email_notifications: Option<bool>,
    pub sms_notifications: Option<bool>,
    pub marketing_emails: Option<bool>,
    pub two_factor_auth: Option<bool>,
    pub dark_mode: Option<bool>,
}

impl Preferences {
    fn apply(&mut self, patch: PreferencesPatch) {
        let fields = [
            (&mut self.email_notifications, patch.email_notifications),
            (&mut self.sms_notifications, patch.sms_notifications),
            (&mut self.marketing_emails, patch.marketing_emails),
            (&mut self.two_factor_auth, patch.two_factor_auth),
            (&mut self.dark_mode, patch.dark_mode),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                *field = value;
            }
        }
    }
}

impl UserRecord {
    fn apply(&mut self, patch: &ProfilePatch) {
        if let Some(v) = &patch.first_name {
            self.first_name.clone_from(v);
        }
        if let Some(v) = &patch.last_name {
            self.last_name.clone_from(v);
        }
        if let Some(v) = &patch.profile_image {
            self.profile_image = Some(v.clone());
        }
        if let Some(v) = &patch.bio {
            self.bio = Some(v.clone());
        }
        if let Some(v) = &patch.location {
            self.location = Some(v.clone());
        }
        if let Some(v) = &patch.social_links {
            self.social_links = v.clone();
        }
    }
}

// =============================================================================
// REPOSITORY
// =============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: u64) -> Option<UserRecord>;

    /// Exact email match.
    async fn find_by_email(&self, email: &str) -> Option<UserRecord>;

    /// Append a record. Fails with `EmailTaken` if the email is present.
    async fn insert(&self, user: NewUser) -> Result<UserRecord, UserError>;

    async fn update_profile(&self, id: u64, patch: &ProfilePatch) -> Result<UserRecord, UserError>;

    async fn update_preferences(&self, id: u64, patch: PreferencesPatch) -> Result<Preferences, UserError>;

    async fn set_password(&self, id: u64, password: &str) -> Result<(), UserError>;

    async fn list(&self) -> Vec<UserRecord>;

    async fn len(&self) -> usize;
}

/// In-memory user table.
pub struct InMemoryUserRepository {
    users: RwLock<Vec<UserRecord>>,
}

impl InMemoryUserRepository {
    #[must_use]
    pub fn new(users: Vec<UserRecord>) -> Self {
        Self { users: RwLock::new(users) }
    }

    /// Table populated with the demo accounts and profile directory.
    #[must_use]
    pub fn seeded() -> Self {
        Self::new(seed::users())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: u64) -> Option<UserRecord> {
        self.users.read().await.iter().find(|u| u.id == id).cloned()
    }

    async fn find_by_email(&self, email: &str) -> Option<UserRecord> {
        self.users.read().await.iter().find(|u| u.email == email).cloned()
    }

    async fn insert(&self, user: NewUser) -> Result<UserRecord, UserError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(UserError::EmailTaken(user.email));
        }
        let record = UserRecord {
            id: users.len() as u64 + 1,
            email: user.email,
            password: Some(user.password),
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            profile_image: None,
            bio: None,
            last_active: user.joined.clone(),
            joined: user.joined,
            location: None,
            social_links: SocialLinks::default(),
            preferences: Preferences { email_notifications: true, ..Preferences::default() },
            details: RoleDetails::blank(user.role),
        };
        users.push(record.clone());
        Ok(record)
    }

    async fn update_profile(&self, id: u64, patch: &ProfilePatch) -> Result<UserRecord, UserError> {
        let mut users = self.users.write().await;
        let user = users.iter_mut().find(|u| u.id == id).ok_or(UserError::NotFound(id))?;
        user.apply(patch);
        Ok(user.clone())
    }

    async fn update_preferences(&self, id: u64, patch: PreferencesPatch) -> Result<Preferences, UserError> {
        let mut users = self.users.write().await;
        let user = users.iter_mut().find(|u| u.id == id).ok_or(UserError::NotFound(id))?;
        user.preferences.apply(patch);
        Ok(user.preferences)
    }

    async fn set_password(&self, id: u64, password: &str) -> Result<(), UserError> {
        let mut users = self.users.write().await;
        let user = users.iter_mut().find(|u| u.id == id).ok_or(UserError::NotFound(id))?;
        user.password = Some(password.to_owned());
        Ok(())
    }

    async fn list(&self) -> Vec<UserRecord> {
        self.users.read().await.clone()
    }

    async fn len(&self) -> usize {
        self.users.read().await.len()
    }
}

// =============================================================================
// SERVICE
// =============================================================================

/// Role filter for the admin user listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleFilter {
    #[default]
    All,
    Learner,
    Tutor,
    Admin,
}

impl RoleFilter {
    fn admits(self, role: Role) -> bool {
        match self {
            Self::All => true,
            Self::Learner => role == Role::Learner,
            Self::Tutor => role == Role::Tutor,
            Self::Admin => role == Role::Admin,
        }
    }
}

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    #[must_use]
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    /// Resolve the viewer behind an access token.
    pub async fn current_user(&self, access_token: &str) -> Option<UserRecord> {
        let id = token_user_id(access_token)?;
        self.repo.find_by_id(id).await
    }

    pub async fn user_by_id(&self, id: u64) -> Option<UserRecord> {
        self.repo.find_by_id(id).await
    }

    pub async fn update_profile(&self, id: u64, patch: &ProfilePatch) -> Result<UserRecord, UserError> {
        let user = self.repo.update_profile(id, patch).await?;
        tracing::info!(user_id = id, "profile updated");
        Ok(user)
    }

    pub async fn update_preferences(&self, id: u64, patch: PreferencesPatch) -> Result<Preferences, UserError> {
        self.repo.update_preferences(id, patch).await
    }

    pub async fn all_users(&self) -> Vec<UserRecord> {
        self.repo.list().await
    }

    /// Case-insensitive match on first name, last name or email, narrowed by role.
    pub async fn search(&self, query: &str, filter: RoleFilter) -> Vec<UserRecord> {
        let query = query.trim();
        self.repo
            .list()
            .await
            .into_iter()
            .filter(|u| filter.admits(u.role))
            .filter(|u| query.is_empty() || u.matches(query))
            .collect()
    }

    /// Learning stats for a learner. `None` for unknown ids and other roles.
    pub async fn learner_profile(&self, id: u64) -> Option<LearnerDetails> {
        match self.repo.find_by_id(id).await?.details {
            RoleDetails::Learner(details) => Some(details),
            _ => None,
        }
    }

    /// Teaching record for a tutor. `None` for unknown ids and other roles.
    pub async fn tutor_profile(&self, id: u64) -> Option<TutorDetails> {
        match self.repo.find_by_id(id).await?.details {
            RoleDetails::Tutor(details) => Some(details),
            _ => None,
        }
    }
}

// =============================================================================
// SEED DATA
// =============================================================================

mod seed {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    #[allow(clippy::too_many_arguments)]
    fn base(
        id: u64,
        email: &str,
        password: Option<&str>,
        (first_name, last_name): (&str, &str),
        role: Role,
        bio: &str,
        (joined, last_active): (&str, &str),
        location: &str,
        details: RoleDetails,
    ) -> UserRecord {
        UserRecord {
            id,
            email: email.to_owned(),
            password: password.map(str::to_owned),
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            role,
            profile_image: Some("/placeholder.svg".to_owned()),
            bio: Some(bio.to_owned()),
            joined: joined.to_owned(),
            last_active: last_active.to_owned(),
            location: Some(location.to_owned()),
            social_links: SocialLinks::default(),
            preferences: Preferences::default(),
            details,
        }
    }

    #[allow(clippy::too_many_lines)]
    pub(super) fn users() -> Vec<UserRecord> {
        let mut admin = base(
            1,
            "admin@example.com",
            Some("admin123"),
            ("Admin", "User"),
            Role::Admin,
            "Platform administrator responsible for user and content management.",
            ("2022-01-10", "2024-04-28"),
            "Chicago, USA",
            RoleDetails::Admin(AdminDetails {
                department: "Platform Operations".into(),
                admin_since: "2022-01-10".into(),
                permissions: strings(&["user_management", "content_moderation", "system_settings", "analytics"]),
                managed_areas: strings(&["Users", "Courses", "Reports", "System Configuration"]),
            }),
        );
        admin.preferences = Preferences {
            email_notifications: true,
            sms_notifications: true,
            two_factor_auth: true,
            dark_mode: true,
            ..Preferences::default()
        };

        let mut tutor = base(
            2,
            "tutor@example.com",
            Some("tutor123"),
            ("Sarah", "Johnson"),
            Role::Tutor,
            "Senior Frontend Developer with 8+ years of experience. Passionate about teaching and mentoring.",
            ("2022-05-10", "2024-04-28"),
            "San Francisco, USA",
            RoleDetails::Tutor(TutorDetails {
                courses_created: 4,
                students_count: 1243,
                specializations: strings(&["React", "JavaScript", "Frontend Development"]),
                ratings: Ratings { average: 4.8, count: 245 },
                education: strings(&["M.S. Computer Science, Stanford University", "B.S. Software Engineering, MIT"]),
                experience: strings(&[
                    "Senior Frontend Developer at Google (2020-Present)",
                    "Frontend Developer at Microsoft (2016-2020)",
                ]),
            }),
        );
        tutor.social_links = SocialLinks {
            twitter: Some("sarahjohnson".into()),
            linkedin: Some("sarahjohnson".into()),
            website: Some("sarahjohnson.dev".into()),
        };
        tutor.preferences = Preferences {
            email_notifications: true,
            sms_notifications: true,
            two_factor_auth: true,
            ..Preferences::default()
        };

        let mut learner = base(
            3,
            "learner@example.com",
            Some("learner123"),
            ("Jane", "Smith"),
            Role::Learner,
            "Career switcher learning data analysis in the evenings.",
            ("2024-01-08", "2024-04-27"),
            "Austin, USA",
            RoleDetails::Learner(LearnerDetails {
                enrolled_courses: 4,
                completed_courses: 1,
                certificates_earned: 1,
                average_grade: 90.0,
                interests: strings(&["Data Science", "Programming"]),
                current_goals: strings(&["Finish Data Science Fundamentals"]),
            }),
        );
        learner.preferences.email_notifications = true;

        let mut john = base(
            4,
            "john.doe@example.com",
            None,
            ("John", "Doe"),
            Role::Learner,
            "Passionate learner focusing on web development and UI/UX design.",
            ("2023-09-15", "2024-04-27"),
            "New York, USA",
            RoleDetails::Learner(LearnerDetails {
                enrolled_courses: 5,
                completed_courses: 2,
                certificates_earned: 2,
                average_grade: 92.5,
                interests: strings(&["Web Development", "UI/UX Design", "Mobile Development"]),
                current_goals: strings(&["Complete React Nanodegree", "Build portfolio website"]),
            }),
        );
        john.social_links = SocialLinks {
            twitter: Some("johndoe".into()),
            linkedin: Some("johndoe".into()),
            website: Some("johndoe.com".into()),
        };
        john.preferences = Preferences {
            email_notifications: true,
            marketing_emails: true,
            dark_mode: true,
            ..Preferences::default()
        };

        let mut michael = base(
            5,
            "michael.chen@example.com",
            None,
            ("Michael", "Chen"),
            Role::Tutor,
            "Python expert with focus on data science and machine learning applications.",
            ("2022-08-20", "2024-04-26"),
            "Boston, USA",
            RoleDetails::Tutor(TutorDetails {
                courses_created: 3,
                students_count: 876,
                specializations: strings(&["Python", "Data Science", "Machine Learning"]),
                ratings: Ratings { average: 4.7, count: 178 },
                education: strings(&["Ph.D. Computer Science, Harvard University", "B.S. Mathematics, Caltech"]),
                experience: strings(&[
                    "Lead Data Scientist at Amazon (2019-Present)",
                    "Data Scientist at IBM (2015-2019)",
                ]),
            }),
        );
        michael.social_links = SocialLinks {
            twitter: Some("michaelchen".into()),
            linkedin: Some("michaelchen".into()),
            website: None,
        };
        michael.preferences = Preferences {
            email_notifications: true,
            two_factor_auth: true,
            dark_mode: true,
            ..Preferences::default()
        };

        let mut emily = base(
            6,
            "emily.rodriguez@example.com",
            None,
            ("Emily", "Rodriguez"),
            Role::Learner,
            "Marketing professional looking to expand digital skills.",
            ("2023-12-05", "2024-04-25"),
            "Miami, USA",
            RoleDetails::Learner(LearnerDetails {
                enrolled_courses: 3,
                completed_courses: 1,
                certificates_earned: 1,
                average_grade: 88.0,
                interests: strings(&["Digital Marketing", "SEO", "Content Strategy"]),
                current_goals: strings(&["Complete Digital Marketing Certificate", "Learn SEO fundamentals"]),
            }),
        );
        emily.social_links.linkedin = Some("emilyrodriguez".into());
        emily.preferences = Preferences {
            email_notifications: true,
            sms_notifications: true,
            marketing_emails: true,
            ..Preferences::default()
        };

        vec![admin, tutor, learner, john, michael, emily]
    }
}

#[cfg(test)]
#[path = "users_test.rs"]
mod tests;

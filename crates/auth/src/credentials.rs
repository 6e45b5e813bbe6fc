use {
    base64::Engine,
    hackernews_store::{Database, Filter, NewSession, NewUser, User},
    rand::RngCore,
    tracing::debug,
};

use crate::{
    Error, Result,
    password::{hash_password, verify_password},
};

/// Outcome of a successful sign-in.
#[derive(Debug, Clone)]
pub struct SignIn {
    pub token: String,
    pub user: User,
}

/// 32 random bytes, URL-safe base64 without padding.
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Extract the token from an `Authorization: Bearer <token>` value.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Create a user whose password is stored only as an Argon2 hash.
///
/// An email identifies one user; registering a taken one fails with
/// [`Error::EmailTaken`] even when two registrations race.
pub async fn register(
    db: &Database,
    name: &str,
    email: Option<&str>,
    password: &str,
) -> Result<User> {
    let new = NewUser {
        name: name.to_string(),
        email: email.map(str::to_string),
        password_hash: hash_password(password)?,
    };
    let user = match new.email {
        Some(_) => db
            .users
            .insert_unique("email", &new)
            .await?
            .ok_or(Error::EmailTaken)?,
        None => db.users.insert(&new).await?,
    };
    debug!(user_id = %user.id, "registered user");
    Ok(user)
}

/// Check `email`/`password` and hand out the user's token.
///
/// The first successful sign-in mints a token; later ones return the same
/// token so it stays a stable per-user credential.
pub async fn sign_in(db: &Database, email: &str, password: &str) -> Result<SignIn> {
    let Some(user) = db.users.find_one(&Filter::eq("email", email)).await? else {
        debug!("sign-in for unknown email");
        return Err(Error::InvalidCredentials);
    };
    if !verify_password(password, &user.password_hash) {
        debug!(user_id = %user.id, "sign-in with wrong password");
        return Err(Error::InvalidCredentials);
    }

    let token = session_token(db, &user).await?;
    Ok(SignIn { token, user })
}

/// The user's one session token, minted on first use.
async fn session_token(db: &Database, user: &User) -> Result<String> {
    let by_user = Filter::eq("userId", user.id.as_str());
    if let Some(session) = db.sessions.find_one(&by_user).await? {
        return Ok(session.token);
    }
    let minted = db
        .sessions
        .insert_unique("userId", &NewSession {
            token: generate_token(),
            user_id: user.id.clone(),
        })
        .await?;
    if let Some(session) = minted {
        debug!(user_id = %user.id, "issued token");
        return Ok(session.token);
    }
    // A concurrent sign-in minted it first.
    db.sessions
        .find_one(&by_user)
        .await?
        .map(|session| session.token)
        .ok_or(Error::InvalidCredentials)
}

/// The user a token was issued to, or `None` for unknown tokens and
/// sessions whose user no longer exists.
pub async fn authenticate(db: &Database, token: &str) -> Result<Option<User>> {
    let Some(session) = db.sessions.find_one(&Filter::eq("token", token)).await? else {
        return Ok(None);
    };
    Ok(db.users.find_by_id(&session.user_id).await?)
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_header_parsing() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("bearer   abc  "), Some("abc"));
        assert_eq!(bearer_token("BEARER abc"), Some("abc"));
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("abc"), None);
    }

    #[test]
    fn tokens_are_url_safe_and_unique() {
        let a = generate_token();
        assert_eq!(a.len(), 43);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_ne!(a, generate_token());
    }

    #[tokio::test]
    async fn sign_in_returns_stable_token() {
        let db = Database::in_memory();
        let user = register(&db, "Ada", Some("ada@example.com"), "secret")
            .await
            .unwrap();

        let first = sign_in(&db, "ada@example.com", "secret").await.unwrap();
        let second = sign_in(&db, "ada@example.com", "secret").await.unwrap();
        assert_eq!(first.user.id, user.id);
        assert_eq!(first.token, second.token);

        let viewer = authenticate(&db, &first.token).await.unwrap().unwrap();
        assert_eq!(viewer.id, user.id);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_fail_alike() {
        let db = Database::in_memory();
        register(&db, "Ada", Some("ada@example.com"), "secret")
            .await
            .unwrap();

        let wrong = sign_in(&db, "ada@example.com", "nope").await.unwrap_err();
        let unknown = sign_in(&db, "bob@example.com", "secret").await.unwrap_err();
        assert!(matches!(wrong, Error::InvalidCredentials));
        assert!(matches!(unknown, Error::InvalidCredentials));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn concurrent_first_sign_ins_share_one_token() {
        let db = Database::in_memory();
        register(&db, "Ada", Some("ada@example.com"), "secret")
            .await
            .unwrap();

        let (a, b) = tokio::join!(
            sign_in(&db, "ada@example.com", "secret"),
            sign_in(&db, "ada@example.com", "secret"),
        );
        assert_eq!(a.unwrap().token, b.unwrap().token);
        assert_eq!(db.sessions.find(&Filter::All, hackernews_store::Page::ALL).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn taken_email_is_rejected() {
        let db = Database::in_memory();
        register(&db, "Ada", Some("ada@example.com"), "secret")
            .await
            .unwrap();
        let err = register(&db, "Imposter", Some("ada@example.com"), "other")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::EmailTaken));

        // Users without an email never conflict with each other.
        register(&db, "Anon", None, "a").await.unwrap();
        register(&db, "Anon", None, "b").await.unwrap();
    }

    #[tokio::test]
    async fn unknown_token_is_anonymous() {
        let db = Database::in_memory();
        assert!(authenticate(&db, "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn stored_password_is_hashed() {
        let db = Database::in_memory();
        let user = register(&db, "Ada", None, "secret").await.unwrap();
        assert_ne!(user.password_hash, "secret");
        assert!(verify_password("secret", &user.password_hash));
    }
}

//! Account signup/login and bearer token handling.
//!
//! # Responsibility
//! - Hash and verify credentials (argon2, PHC strings).
//! - Issue and verify signed, time-limited bearer tokens (HS256 JWT).
//!
//! # Invariants
//! - Unknown email and wrong password produce the same `InvalidCredentials`.
//! - A duplicate signup never issues a token.
//! - Tokens expire `TOKEN_TTL_DAYS` after issue; the server keeps no session state.

use crate::model::time::now_millis;
use crate::model::user::{normalize_email, User, UserId, UserRecord};
use crate::model::{non_blank, ValidationError};
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoError;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub const TOKEN_TTL_DAYS: i64 = 7;

#[derive(Debug)]
pub enum AuthError {
    Validation(ValidationError),
    DuplicateAccount,
    InvalidCredentials,
    /// Missing, malformed, expired or revoked bearer token.
    InvalidToken(String),
    Hashing(String),
    Repo(RepoError),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateAccount => write!(f, "User already exists"),
            Self::InvalidCredentials => write!(f, "Invalid email or password"),
            Self::InvalidToken(reason) => write!(f, "invalid token: {reason}"),
            Self::Hashing(message) => write!(f, "credential hashing failed: {message}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for AuthError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for AuthError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Duplicate(_) => Self::DuplicateAccount,
            other => Self::Repo(other),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Signup/login result: the account and a freshly issued bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

/// Signed token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account id.
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// HMAC keys and lifetime used to issue and verify tokens.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenKeys {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::days(TOKEN_TTL_DAYS),
        }
    }

    /// Issues a token for `user_id` valid from `now` for the configured lifetime.
    pub fn issue(&self, user_id: UserId, now: DateTime<Utc>) -> Result<String, AuthError> {
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| AuthError::InvalidToken(err.to_string()))
    }

    /// Verifies signature and expiry and returns the account id.
    pub fn verify(&self, token: &str) -> Result<UserId, AuthError> {
        let data = decode::<Claims>(
            token.trim(),
            &self.decoding,
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|err| AuthError::InvalidToken(err.to_string()))?;
        Uuid::parse_str(&data.claims.sub)
            .map_err(|_| AuthError::InvalidToken("subject is not an account id".to_string()))
    }
}

pub struct AuthService<'k, R: UserRepository> {
    repo: R,
    keys: &'k TokenKeys,
}

impl<'k, R: UserRepository> AuthService<'k, R> {
    pub fn new(repo: R, keys: &'k TokenKeys) -> Self {
        Self { repo, keys }
    }

    /// Registers an account and issues its first token.
    pub fn signup(&self, request: &SignupRequest) -> Result<AuthSession, AuthError> {
        let hashed = self.prepare_signup(request)?.hash()?;
        self.complete_signup(hashed)
    }

    /// Validates a signup and rejects known emails. Does no hashing.
    pub fn prepare_signup(&self, request: &SignupRequest) -> Result<PendingSignup, AuthError> {
        let name = non_blank(request.name.as_deref())
            .ok_or(ValidationError::MissingField("Name is required"))?;
        let email = non_blank(request.email.as_deref())
            .map(|email| normalize_email(&email))
            .ok_or(ValidationError::MissingField("Email is required"))?;
        let password = request
            .password
            .clone()
            .filter(|password| !password.is_empty())
            .ok_or(ValidationError::MissingField("Password is required"))?;

        if self.repo.find_by_email(&email)?.is_some() {
            warn!("event=auth_signup module=auth status=error error_code=duplicate_account");
            return Err(AuthError::DuplicateAccount);
        }
        Ok(PendingSignup {
            name,
            email,
            password,
        })
    }

    /// Stores a hashed signup and issues its first token.
    ///
    /// A concurrent signup for the same email that won the race still
    /// surfaces as `DuplicateAccount` through the unique index.
    pub fn complete_signup(&self, hashed: HashedSignup) -> Result<AuthSession, AuthError> {
        let now = now_millis();
        let record = UserRecord {
            user: User {
                id: Uuid::new_v4(),
                name: hashed.name,
                email: hashed.email,
                created_at: now,
                updated_at: now,
            },
            password_hash: hashed.password_hash,
        };
        let user_id = self.repo.create_user(&record)?;
        let token = self.keys.issue(user_id, now)?;
        info!("event=auth_signup module=auth status=ok user_id={user_id}");

        Ok(AuthSession {
            user: record.user,
            token,
        })
    }

    /// Checks credentials and issues a new token.
    pub fn login(&self, request: &LoginRequest) -> Result<AuthSession, AuthError> {
        self.prepare_login(request)?.finish(self.keys)
    }

    /// Looks up the account behind a login. Does no password verification.
    pub fn prepare_login(&self, request: &LoginRequest) -> Result<PendingLogin, AuthError> {
        let email = request.email.as_deref().unwrap_or_default();
        let Some(record) = self.repo.find_by_email(email)? else {
            warn!("event=auth_login module=auth status=error error_code=invalid_credentials");
            return Err(AuthError::InvalidCredentials);
        };
        Ok(PendingLogin {
            record,
            password: request.password.clone().unwrap_or_default(),
        })
    }

    /// Resolves a bearer token to a live account.
    pub fn authenticate(&self, token: &str) -> Result<User, AuthError> {
        let user_id = self.keys.verify(token)?;
        self.repo
            .get_user(user_id)?
            .ok_or_else(|| AuthError::InvalidToken("account no longer exists".to_string()))
    }
}

/// A validated signup whose password is not hashed yet.
///
/// Hashing is CPU bound and needs no store access; callers sharing a
/// connection should run [`PendingSignup::hash`] outside their lock.
pub struct PendingSignup {
    name: String,
    email: String,
    password: String,
}

impl PendingSignup {
    pub fn hash(self) -> Result<HashedSignup, AuthError> {
        Ok(HashedSignup {
            password_hash: hash_password(&self.password)?,
            name: self.name,
            email: self.email,
        })
    }
}

#[derive(Debug)]
pub struct HashedSignup {
    name: String,
    email: String,
    password_hash: String,
}

/// A found account awaiting password verification.
pub struct PendingLogin {
    record: UserRecord,
    password: String,
}

impl PendingLogin {
    /// Verifies the password and issues a token. Needs no store access.
    pub fn finish(self, keys: &TokenKeys) -> Result<AuthSession, AuthError> {
        if !verify_password(&self.password, &self.record.password_hash)? {
            warn!("event=auth_login module=auth status=error error_code=invalid_credentials");
            return Err(AuthError::InvalidCredentials);
        }
        let user = self.record.user;
        let token = keys.issue(user.id, Utc::now())?;
        info!("event=auth_login module=auth status=ok user_id={}", user.id);
        Ok(AuthSession { user, token })
    }
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AuthError::Hashing(err.to_string()))
}

fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AuthError> {
    let parsed =
        PasswordHash::new(stored_hash).map_err(|err| AuthError::Hashing(err.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

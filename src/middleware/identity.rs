use std::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpRequest};
use uuid::Uuid;

use crate::core::{AppError, Result};

pub const USER_ID_HEADER: &str = "X-Auth-User-Id";
pub const ROLE_HEADER: &str = "X-Auth-Role";
pub const EMPLOYEE_ID_HEADER: &str = "X-Auth-Employee-Id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Employee,
}

impl std::str::FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "EMPLOYEE" => Ok(Role::Employee),
            other => Err(AppError::unauthorized(format!("Unknown role: {}", other))),
        }
    }
}

/// Caller identity forwarded by the upstream authentication layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub role: Role,
    pub employee_id: Option<String>,
}

impl Identity {
    pub fn require_admin(&self) -> Result<()> {
        match self.role {
            Role::Admin => Ok(()),
            Role::Employee => Err(AppError::forbidden("Administrator role required")),
        }
    }

    /// Returns the employee id the caller acts as
    pub fn require_employee(&self) -> Result<&str> {
        match (self.role, self.employee_id.as_deref()) {
            (Role::Employee, Some(employee_id)) => Ok(employee_id),
            (Role::Employee, None) => Err(AppError::unauthorized(format!(
                "{} header required",
                EMPLOYEE_ID_HEADER
            ))),
            (Role::Admin, _) => Err(AppError::forbidden("Employee role required")),
        }
    }

    fn from_request_headers(req: &HttpRequest) -> Result<Self> {
        let header = |name: &str| {
            req.headers()
                .get(name)
                .and_then(|h| h.to_str().ok())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let user_id = header(USER_ID_HEADER)
            .ok_or_else(|| AppError::unauthorized(format!("Missing {} header", USER_ID_HEADER)))?;
        Uuid::parse_str(&user_id)
            .map_err(|_| AppError::unauthorized(format!("Invalid {} header", USER_ID_HEADER)))?;

        let role: Role = header(ROLE_HEADER)
            .ok_or_else(|| AppError::unauthorized(format!("Missing {} header", ROLE_HEADER)))?
            .parse()?;

        let employee_id = match header(EMPLOYEE_ID_HEADER) {
            Some(id) => {
                Uuid::parse_str(&id).map_err(|_| {
                    AppError::unauthorized(format!("Invalid {} header", EMPLOYEE_ID_HEADER))
                })?;
                Some(id)
            }
            None => None,
        };

        Ok(Identity {
            user_id,
            role,
            employee_id,
        })
    }
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<std::result::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Identity::from_request_headers(req))
    }
}

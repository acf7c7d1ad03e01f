// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::{Role, StudentId};

// Carried explicitly on every data-source call instead of living in ambient
// shared storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: AuthToken,
    pub role: Role,
    pub display_name: String,
    // A parent's linked children; empty for other roles.
    pub student_ids: Vec<StudentId>,
}

impl Session {
    pub fn new(token: &str, role: Role, display_name: &str) -> Self {
        Self {
            token: AuthToken::new(token),
            role,
            display_name: display_name.to_owned(),
            student_ids: Vec::new(),
        }
    }

    pub fn with_students(mut self, student_ids: Vec<StudentId>) -> Self {
        self.student_ids = student_ids;
        self
    }

    pub fn is_anonymous(&self) -> bool {
        self.token.is_empty()
    }
}

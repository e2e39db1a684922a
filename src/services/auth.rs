// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login, registration and logout.

use super::{require, ServiceContext};
use crate::error::Result;
use crate::models::{LoginRequest, LoginResponse, RegisterRequest};
use crate::routes::Route;

pub struct AuthService {
    ctx: ServiceContext,
}

impl AuthService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Log in and open the dashboard. Returns the user id.
    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        require(email, "Email")?;
        require(password, "Password")?;

        let credentials = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let response = self.ctx.api.login(&credentials).await.inspect_err(|e| {
            tracing::warn!(error = %e, "Login failed");
            self.ctx.notifier.error("Login failed");
        })?;
        self.begin(&response)
    }

    /// Create an account and log straight in.
    pub async fn register(&self, request: &RegisterRequest) -> Result<String> {
        require(&request.name, "Name")?;
        require(&request.email, "Email")?;
        require(&request.password, "Password")?;

        let response = self.ctx.api.register(request).await.inspect_err(|e| {
            tracing::warn!(error = %e, "Registration failed");
            self.ctx.notifier.error("Registration failed");
        })?;
        self.begin(&response)
    }

    fn begin(&self, response: &LoginResponse) -> Result<String> {
        let user_id = self.ctx.session.begin(response)?;
        self.ctx.navigator.navigate(Route::Dashboard.path());
        self.ctx.notifier.success("Welcome to EduVerse!");
        Ok(user_id)
    }

    /// Drop the session and return to the landing page. Feature data stays.
    pub fn logout(&self) -> Result<()> {
        self.ctx.session.logout()?;
        self.ctx.navigator.navigate(Route::Landing.path());
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.ctx.session.is_authenticated()
    }
}

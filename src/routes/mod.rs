// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client routes and session gating.

pub mod navigator;

pub use navigator::Navigator;

/// Every page the client can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Landing,
    Login,
    Register,
    Dashboard,
    Tutor,
    StudyPlanner,
    ResourceCurator,
    ExamCoach,
    SyllabusAnalyzer,
    LearningPaths,
    Profile,
}

/// Routes reachable without a session (and only without one).
const PUBLIC_ROUTES: [Route; 3] = [Route::Landing, Route::Login, Route::Register];

/// Routes that require a session.
const PROTECTED_ROUTES: [Route; 8] = [
    Route::Dashboard,
    Route::Tutor,
    Route::StudyPlanner,
    Route::ResourceCurator,
    Route::ExamCoach,
    Route::SyllabusAnalyzer,
    Route::LearningPaths,
    Route::Profile,
];

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Dashboard => "/dashboard",
            Route::Tutor => "/tutor",
            Route::StudyPlanner => "/study-planner",
            Route::ResourceCurator => "/resource-curator",
            Route::ExamCoach => "/exam-coach",
            Route::SyllabusAnalyzer => "/syllabus-analyzer",
            Route::LearningPaths => "/learning-paths",
            Route::Profile => "/profile",
        }
    }

    /// Human-readable page name.
    pub fn title(self) -> &'static str {
        match self {
            Route::Landing => "Welcome",
            Route::Login => "Log in",
            Route::Register => "Register",
            Route::Dashboard => "Dashboard",
            Route::Tutor => "AI Tutor",
            Route::StudyPlanner => "Study Planner",
            Route::ResourceCurator => "Resource Curator",
            Route::ExamCoach => "Exam Coach",
            Route::SyllabusAnalyzer => "Syllabus Analyzer",
            Route::LearningPaths => "Learning Paths",
            Route::Profile => "Profile",
        }
    }

    /// Look up a route by path. Trailing slashes and query strings are ignored.
    pub fn from_path(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };

        PUBLIC_ROUTES
            .iter()
            .chain(PROTECTED_ROUTES.iter())
            .copied()
            .find(|route| route.path() == normalized)
    }

    pub fn is_public(self) -> bool {
        PUBLIC_ROUTES.contains(&self)
    }
}

/// Result of resolving a path against the session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Render(Route),
    Redirect(Route),
}

impl Navigation {
    /// The route that ends up on screen.
    pub fn route(self) -> Route {
        match self {
            Navigation::Render(route) | Navigation::Redirect(route) => route,
        }
    }
}

/// Apply the gating rules.
///
/// - unknown paths go to the landing page;
/// - public pages redirect a logged-in user to the dashboard;
/// - protected pages redirect an anonymous user to login.
pub fn resolve(path: &str, authenticated: bool) -> Navigation {
    match Route::from_path(path) {
        None => Navigation::Redirect(Route::Landing),
        Some(route) if route.is_public() && authenticated => Navigation::Redirect(Route::Dashboard),
        Some(route) if !route.is_public() && !authenticated => Navigation::Redirect(Route::Login),
        Some(route) => Navigation::Render(route),
    }
}

/// Navigation bar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub name: &'static str,
    pub route: Route,
    pub description: &'static str,
}

/// Entries of the navigation bar, in display order.
pub fn menu() -> Vec<MenuItem> {
    [
        (Route::Dashboard, "Overview of your learning tools"),
        (Route::Tutor, "Get personalized explanations and learning assistance"),
        (Route::StudyPlanner, "Create and manage your personalized study schedules"),
        (Route::ResourceCurator, "Discover and curate educational resources"),
        (Route::ExamCoach, "Practice with AI-generated exams and assessments"),
        (Route::SyllabusAnalyzer, "Upload and analyze your course syllabi"),
        (Route::LearningPaths, "Follow structured learning journeys"),
    ]
    .into_iter()
    .map(|(route, description)| MenuItem {
        name: route.title(),
        route,
        description,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path_normalizes() {
        assert_eq!(Route::from_path("/exam-coach/"), Some(Route::ExamCoach));
        assert_eq!(Route::from_path("/tutor?x=1"), Some(Route::Tutor));
        assert_eq!(Route::from_path(""), Some(Route::Landing));
        assert_eq!(Route::from_path("/nope"), None);
    }

    #[test]
    fn test_menu_starts_with_dashboard() {
        let items = menu();
        assert_eq!(items.len(), 7);
        assert_eq!(items[0].route, Route::Dashboard);
        assert!(items.iter().all(|i| !i.route.is_public()));
    }
}

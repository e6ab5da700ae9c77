use std::fmt;

use uuid::Uuid;

pub const LIST_PATH: &str = "/";
pub const CREATE_PATH: &str = "/addform";
pub const EDIT_PREFIX: &str = "/updateform/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    List,
    Create,
    Edit(Uuid),
    /// Anything that did not match, including edit paths with a malformed id.
    NotFound(String),
}

impl Route {
    pub fn parse(path: &str) -> Self {
        let path = path.trim();
        match path {
            "" | LIST_PATH => Self::List,
            CREATE_PATH => Self::Create,
            _ => match path.strip_prefix(EDIT_PREFIX) {
                Some(id) => Uuid::parse_str(id)
                    .map(Self::Edit)
                    .unwrap_or_else(|_| Self::NotFound(path.to_string())),
                None => Self::NotFound(path.to_string()),
            },
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::List => LIST_PATH.to_string(),
            Self::Create => CREATE_PATH.to_string(),
            Self::Edit(id) => format!("{}{}", EDIT_PREFIX, id),
            Self::NotFound(path) => path.clone(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Where a form wants to go once it is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Back,
}

/// Current route plus the history needed to go back.
#[derive(Debug, Clone)]
pub struct Router {
    current: Route,
    history: Vec<Route>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new(Route::List)
    }
}

impl Router {
    pub fn new(initial: Route) -> Self {
        Self {
            current: initial,
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> &Route {
        &self.current
    }

    pub fn navigate(&mut self, route: Route) {
        tracing::debug!(from = %self.current, to = %route, "navigate");
        let previous = std::mem::replace(&mut self.current, route);
        self.history.push(previous);
    }

    pub fn navigate_path(&mut self, path: &str) {
        self.navigate(Route::parse(path));
    }

    /// Swap the current route without adding a history entry.
    pub fn replace(&mut self, route: Route) {
        tracing::debug!(from = %self.current, to = %route, "replace route");
        self.current = route;
    }

    /// Return to the previous route; falls back to the list when there is none.
    pub fn back(&mut self) -> &Route {
        self.current = self.history.pop().unwrap_or(Route::List);
        tracing::debug!(to = %self.current, "navigate back");
        &self.current
    }

    pub fn apply(&mut self, navigation: Navigation) -> &Route {
        match navigation {
            Navigation::Back => self.back(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_paths() {
        assert_eq!(Route::parse("/"), Route::List);
        assert_eq!(Route::parse(""), Route::List);
        assert_eq!(Route::parse("/addform"), Route::Create);

        let id = Uuid::new_v4();
        assert_eq!(Route::parse(&format!("/updateform/{}", id)), Route::Edit(id));
    }

    #[test]
    fn unknown_paths_are_not_found() {
        assert_eq!(Route::parse("/nope"), Route::NotFound("/nope".to_string()));
        assert_eq!(
            Route::parse("/updateform/123"),
            Route::NotFound("/updateform/123".to_string())
        );
        assert_eq!(
            Route::parse("/updateform/"),
            Route::NotFound("/updateform/".to_string())
        );
    }

    #[test]
    fn path_round_trips_through_parse() {
        let id = Uuid::new_v4();
        for route in [Route::List, Route::Create, Route::Edit(id)] {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }

    #[test]
    fn back_returns_to_previous_route() {
        let mut router = Router::default();
        router.navigate(Route::Create);
        assert_eq!(router.current(), &Route::Create);
        assert_eq!(router.back(), &Route::List);
    }

    #[test]
    fn back_with_empty_history_goes_to_list() {
        let mut router = Router::new(Route::Create);
        assert_eq!(router.apply(Navigation::Back), &Route::List);
        assert_eq!(router.back(), &Route::List);
    }

    #[test]
    fn replace_keeps_history() {
        let mut router = Router::default();
        let id = Uuid::new_v4();
        router.navigate(Route::Edit(id));
        router.replace(Route::NotFound(format!("/updateform/{}", id)));
        assert_eq!(router.back(), &Route::List);
    }
}

//! Top-level pages and the header's navigation state.

use core::fmt;

/// A top-level page of the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Products,
    Login,
    Register,
    Checkout,
    Thanks,
}

impl Page {
    /// Route path of the page.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Products => "/",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Checkout => "/checkout",
            Self::Thanks => "/thanks",
        }
    }

    /// Resolve a route path. Unknown paths yield `None`.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            "/" => Some(Self::Products),
            "/login" => Some(Self::Login),
            "/register" => Some(Self::Register),
            "/checkout" => Some(Self::Checkout),
            "/thanks" => Some(Self::Thanks),
            _ => None,
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// What the header shows on the right-hand side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderState {
    /// Auth buttons hidden (login/register pages): a single "back to explore"
    /// link to the products page.
    BackToExplore,
    /// Signed in: avatar, username and a logout action.
    SignedIn { username: String },
    /// Signed out: login and register actions.
    SignedOut,
}

impl HeaderState {
    /// Decide the header state.
    ///
    /// `username` is the display name stored alongside the session token, or
    /// `None` when no session is present.
    #[must_use]
    pub fn resolve(hide_auth_buttons: bool, username: Option<&str>) -> Self {
        if hide_auth_buttons {
            return Self::BackToExplore;
        }
        username.map_or(Self::SignedOut, |name| Self::SignedIn {
            username: name.to_string(),
        })
    }

    /// Pages reachable from the header in this state.
    #[must_use]
    pub const fn links(&self) -> &'static [Page] {
        match self {
            Self::BackToExplore => &[Page::Products],
            // Logout clears the session and returns to the products page
            Self::SignedIn { .. } => &[Page::Products],
            Self::SignedOut => &[Page::Login, Page::Register],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_paths_round_trip() {
        for page in [
            Page::Products,
            Page::Login,
            Page::Register,
            Page::Checkout,
            Page::Thanks,
        ] {
            assert_eq!(Page::from_path(page.path()), Some(page));
        }
        assert_eq!(Page::from_path("/admin"), None);
    }

    #[test]
    fn test_header_hidden_buttons_wins_over_session() {
        assert_eq!(
            HeaderState::resolve(true, Some("crio")),
            HeaderState::BackToExplore
        );
    }

    #[test]
    fn test_header_signed_in_and_out() {
        assert_eq!(
            HeaderState::resolve(false, Some("crio")),
            HeaderState::SignedIn {
                username: "crio".to_string()
            }
        );
        assert_eq!(HeaderState::resolve(false, None), HeaderState::SignedOut);
        assert_eq!(
            HeaderState::SignedOut.links(),
            &[Page::Login, Page::Register]
        );
    }
}

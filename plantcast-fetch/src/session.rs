//! Session-scoped token state.

use plantcast_core::TokenPair;

/// Token pair owned by the active user session.
///
/// Fetches take the session by `&mut` so a renewal during one fetch is seen
/// by every later one. Only the fetcher's renewal path replaces the tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    tokens: TokenPair,
    renewals: u32,
}

impl Session {
    /// Starts a session from a freshly issued token pair.
    pub fn new(tokens: TokenPair) -> Self {
        Self {
            tokens,
            renewals: 0,
        }
    }

    /// Returns the current token pair.
    pub fn tokens(&self) -> &TokenPair {
        &self.tokens
    }

    /// Returns the current access token.
    pub fn access_token(&self) -> &str {
        &self.tokens.access_token
    }

    /// Returns the current refresh token.
    pub fn refresh_token(&self) -> &str {
        &self.tokens.refresh_token
    }

    /// Returns how many times the tokens were renewed in this session.
    pub fn renewals(&self) -> u32 {
        self.renewals
    }

    /// Replaces the token pair after a successful renewal.
    pub(crate) fn replace_tokens(&mut self, tokens: TokenPair) {
        self.tokens = tokens;
        self.renewals += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_tokens_swaps_whole_pair() {
        let mut session = Session::new(TokenPair::new("a1", "r1"));
        assert_eq!(session.renewals(), 0);

        session.replace_tokens(TokenPair::new("a2", "r2"));

        assert_eq!(session.access_token(), "a2");
        assert_eq!(session.refresh_token(), "r2");
        assert_eq!(session.renewals(), 1);
    }
}

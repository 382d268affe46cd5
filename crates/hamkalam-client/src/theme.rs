//! Dark/light mode toggle.

use std::sync::Arc;

use tracing::{error, info};

use hamkalam_shared::types::Theme;

use crate::api::ThemeApi;

/// Theme toggle button state. The server owns the persisted preference;
/// the local class only flips once the server confirms.
pub struct ThemeToggle {
    api: Arc<dyn ThemeApi>,
    theme: Theme,
}

impl ThemeToggle {
    pub fn new(api: Arc<dyn ThemeApi>, initial: Theme) -> Self {
        Self { api, theme: initial }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Glyph currently shown on the button.
    pub fn glyph(&self) -> &'static str {
        self.theme.toggle_glyph()
    }

    /// Request a theme change. On failure the presentation state is left
    /// unchanged; no retry.
    pub async fn toggle(&mut self) {
        match self.api.toggle_theme().await {
            Ok(resp) => {
                self.theme = resp.theme;
                info!(theme = ?self.theme, "Theme toggled");
            }
            Err(e) => {
                error!(error = %e, "Error toggling theme");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;

    use crate::api::{ApiError, ThemeResponse};

    struct FixedThemeApi {
        response: Result<Theme, ()>,
    }

    #[async_trait]
    impl ThemeApi for FixedThemeApi {
        async fn toggle_theme(&self) -> Result<ThemeResponse, ApiError> {
            match self.response {
                Ok(theme) => Ok(ThemeResponse {
                    success: true,
                    theme,
                }),
                Err(()) => Err(ApiError::Rejected),
            }
        }
    }

    #[tokio::test]
    async fn test_toggle_follows_server_theme() {
        let api = Arc::new(FixedThemeApi {
            response: Ok(Theme::Dark),
        });
        let mut toggle = ThemeToggle::new(api, Theme::Light);

        toggle.toggle().await;

        assert_eq!(toggle.theme(), Theme::Dark);
        assert_eq!(toggle.glyph(), "☀️");
    }

    #[tokio::test]
    async fn test_failure_leaves_theme_unchanged() {
        let api = Arc::new(FixedThemeApi { response: Err(()) });
        let mut toggle = ThemeToggle::new(api, Theme::Light);

        toggle.toggle().await;

        assert_eq!(toggle.theme(), Theme::Light);
        assert_eq!(toggle.glyph(), "🌙");
    }
}

use crate::error::{Result, SmartMatchError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Visual style the user picked for the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Style {
    /// Let the prompt optimizer choose a style that fits the text.
    #[default]
    Auto,
    Photographic,
    Cinematic,
    Anime,
    #[serde(rename = "3D Render")]
    Render3D,
    Watercolor,
    Minimalist,
    Cyberpunk,
}

impl Style {
    pub const ALL: [Style; 8] = [
        Style::Auto,
        Style::Photographic,
        Style::Cinematic,
        Style::Anime,
        Style::Render3D,
        Style::Watercolor,
        Style::Minimalist,
        Style::Cyberpunk,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Style::Auto => "Auto",
            Style::Photographic => "Photographic",
            Style::Cinematic => "Cinematic",
            Style::Anime => "Anime",
            Style::Render3D => "3D Render",
            Style::Watercolor => "Watercolor",
            Style::Minimalist => "Minimalist",
            Style::Cyberpunk => "Cyberpunk",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Style::Auto => "✨ Smart match",
            Style::Photographic => "📸 Photorealistic",
            Style::Cinematic => "🎬 Cinematic",
            Style::Anime => "🌸 Anime",
            Style::Render3D => "🧊 3D render",
            Style::Watercolor => "🎨 Watercolor",
            Style::Minimalist => "⚪ Minimalist",
            Style::Cyberpunk => "🌃 Cyberpunk",
        }
    }

    /// Art direction handed to the prompt optimizer. `None` for `Auto`, which
    /// sends no style hint at all.
    pub fn directive(&self) -> Option<&'static str> {
        match self {
            Style::Auto => None,
            Style::Photographic => Some("Photorealistic Photography, 8k, highly detailed"),
            Style::Cinematic => Some("Cinematic, movie scene, dramatic lighting, 8k"),
            Style::Anime => Some("Japanese Anime Style, vibrant colors, detailed"),
            Style::Render3D => Some("3D Render, Unreal Engine 5, Octane Render, isometric"),
            Style::Watercolor => Some("Artistic Watercolor painting, soft edges, ethereal"),
            Style::Minimalist => Some("Minimalist Vector Art, flat design, clean lines"),
            Style::Cyberpunk => Some("Cyberpunk, neon lights, futuristic city, high contrast"),
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Style {
    type Err = SmartMatchError;

    /// Case-insensitive; spaces, dashes and underscores are ignored, so
    /// `"3D Render"`, `"3d-render"` and `"render3d"` all parse.
    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();

        let style = match key.as_str() {
            "" | "auto" => Style::Auto,
            "photographic" | "photo" | "photorealistic" => Style::Photographic,
            "cinematic" => Style::Cinematic,
            "anime" => Style::Anime,
            "3drender" | "render3d" | "3d" => Style::Render3D,
            "watercolor" => Style::Watercolor,
            "minimalist" => Style::Minimalist,
            "cyberpunk" => Style::Cyberpunk,
            _ => {
                return Err(SmartMatchError::ConfigError(format!(
                    "Unknown style '{}'",
                    s
                )))
            }
        };
        Ok(style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_has_no_directive() {
        assert!(Style::Auto.directive().is_none());
        for style in Style::ALL.iter().skip(1) {
            assert!(style.directive().is_some(), "{} lacks a directive", style);
        }
    }

    #[test]
    fn test_parse_is_lenient() {
        assert_eq!("3D Render".parse::<Style>().unwrap(), Style::Render3D);
        assert_eq!("3d-render".parse::<Style>().unwrap(), Style::Render3D);
        assert_eq!("render3d".parse::<Style>().unwrap(), Style::Render3D);
        assert_eq!("CYBERPUNK".parse::<Style>().unwrap(), Style::Cyberpunk);
        assert_eq!("".parse::<Style>().unwrap(), Style::Auto);
        assert!("baroque".parse::<Style>().is_err());
    }

    #[test]
    fn test_ids_round_trip() {
        for style in Style::ALL {
            assert_eq!(style.id().parse::<Style>().unwrap(), style);
        }
    }
}

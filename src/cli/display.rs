// src/cli/display.rs — Plain-text rendering of recommendations and profiles

use std::fmt::Write;

use crate::api::types::{Recommendation, Track, UserProfile};
use crate::util::truncate_str;

/// Explanations are cut to this many bytes in list views.
const EXPLANATION_PREVIEW: usize = 120;

fn track_line(index: usize, track: &Track) -> String {
    let mut line = format!("{:>2}. {} — {}", index + 1, track.name, track.artist);
    if !track.album.is_empty() {
        let _ = write!(line, " ({})", track.album);
    }
    line
}

/// One-paragraph summary per recommendation.
pub fn render_summary(rec: &Recommendation) -> String {
    let mut out = String::new();
    let context = rec
        .context_description
        .as_deref()
        .filter(|c| !c.is_empty())
        .unwrap_or("no context");
    let _ = writeln!(
        out,
        "#{} · {} · {}",
        rec.id,
        rec.created_at.format("%Y-%m-%d %H:%M"),
        context
    );
    for (i, track) in rec.tracks.iter().enumerate() {
        let _ = writeln!(out, "  {}", track_line(i, track));
        if !track.explanation.is_empty() {
            let explanation = truncate_str(&track.explanation, EXPLANATION_PREVIEW);
            let ellipsis = if explanation.len() < track.explanation.len() {
                "…"
            } else {
                ""
            };
            let _ = writeln!(out, "      {explanation}{ellipsis}");
        }
    }
    out
}

/// Full view with untruncated explanations, links and previews.
pub fn render_detail(rec: &Recommendation) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Recommendation #{}", rec.id);
    let _ = writeln!(out, "Created: {}", rec.created_at.format("%Y-%m-%d %H:%M UTC"));
    if let Some(context) = rec.context_description.as_deref().filter(|c| !c.is_empty()) {
        let _ = writeln!(out, "Context: {context}");
    }
    for (i, track) in rec.tracks.iter().enumerate() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", track_line(i, track));
        if !track.explanation.is_empty() {
            let _ = writeln!(out, "    {}", track.explanation);
        }
        if !track.external_id.is_empty() {
            let _ = writeln!(out, "    https://open.spotify.com/track/{}", track.external_id);
        }
        if let Some(preview) = track.preview() {
            let _ = writeln!(out, "    preview: {preview}");
        }
    }
    out
}

pub fn render_profile(profile: &UserProfile) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", profile.greeting_name());
    if !profile.username.is_empty() {
        let _ = writeln!(out, "  username: {}", profile.username);
    }
    if !profile.email.is_empty() {
        let _ = writeln!(out, "  email:    {}", profile.email);
    }
    if !profile.bio.is_empty() {
        let _ = writeln!(out, "  bio:      {}", profile.bio);
    }
    if profile.has_custom_picture() {
        let _ = writeln!(out, "  picture:  {}", profile.profile_image_url);
    }
    let genres = if profile.favorite_genres.is_empty() {
        "(none)".to_string()
    } else {
        profile.favorite_genres.join(", ")
    };
    let _ = writeln!(out, "  genres:   {genres}");
    let notifications = &profile.preferences.notification_settings;
    let _ = writeln!(
        out,
        "  theme:    {} · email notifications {} · push notifications {}",
        profile.preferences.theme,
        on_off(notifications.email_notifications),
        on_off(notifications.push_notifications)
    );
    out
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

// src/cli/profile.rs — profile, picture and genre commands

use std::path::Path;

use crate::api::types::{ProfileUpdate, UserProfile};
use crate::api::ShareTunesApi;
use crate::cli::display::render_profile;
use crate::cli::ProfileAction;
use crate::util::image_mime_for;

pub async fn run_profile(api: &ShareTunesApi, action: Option<ProfileAction>) -> anyhow::Result<()> {
    match action.unwrap_or(ProfileAction::Show) {
        ProfileAction::Show => {
            let profile = UserProfile::from(api.users.profile().await?);
            print!("{}", render_profile(&profile));
        }
        ProfileAction::Update {
            username,
            email,
            display_name,
            bio,
            theme,
        } => {
            let preferences = match theme {
                Some(theme) => {
                    // Preferences are sent whole, so start from the stored ones.
                    let mut current = UserProfile::from(api.users.profile().await?).preferences;
                    current.theme = theme;
                    Some(current)
                }
                None => None,
            };
            let update = ProfileUpdate {
                username,
                email,
                bio,
                display_name,
                preferences,
                ..ProfileUpdate::default()
            };
            if update.is_empty() {
                anyhow::bail!("Nothing to update. Pass at least one of --username, --email, --display-name, --bio, --theme.");
            }
            let updated = UserProfile::from(api.users.update_profile(&update).await?);
            println!("Profile updated.");
            print!("{}", render_profile(&updated));
        }
        ProfileAction::Picture { path } => {
            let path = Path::new(&path);
            let bytes = tokio::fs::read(path).await?;
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("picture")
                .to_string();
            let url = api
                .users
                .update_profile_picture(&file_name, image_mime_for(path), bytes)
                .await?;
            match url {
                Some(url) => println!("Profile picture updated: {url}"),
                None => println!("Profile picture uploaded."),
            }
        }
        ProfileAction::Genres { set } => {
            let genres = if set.is_empty() {
                api.users.favorite_genres().await?
            } else {
                api.users.set_favorite_genres(&set).await?
            };
            if genres.is_empty() {
                println!("No favorite genres set.");
            } else {
                println!("{}", genres.join(", "));
            }
        }
    }
    Ok(())
}

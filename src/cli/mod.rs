// src/cli/mod.rs — CLI definition (clap derive)

pub mod display;
pub mod profile;
pub mod recommend;
pub mod session;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sharetunes", about = "Music recommendations from your Spotify taste", version)]
pub struct Cli {
    /// Config file path
    #[arg(long)]
    pub config: Option<String>,

    /// Backend base URL (overrides config and SHARETUNES_API_URL)
    #[arg(long)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in with Spotify (prints the authorization URL)
    Login {
        /// Open the URL in the default browser
        #[arg(long)]
        open: bool,
    },
    /// Finish sign-in with the URL the browser was redirected to
    Callback {
        /// Full redirect URL or its query string
        redirect: String,
    },
    /// Forget the stored session tokens
    Logout,
    /// Show whether a session is stored and which backend is used
    Status,
    /// Profile and recent recommendations at a glance
    Dashboard {
        /// Generate a new recommendation for this mood/situation first
        #[arg(long)]
        generate: Option<String>,
    },
    /// Browse and generate recommendations
    #[command(visible_alias = "rec")]
    Recommendations {
        #[command(subcommand)]
        action: RecommendAction,
    },
    /// View and edit your profile
    Profile {
        #[command(subcommand)]
        action: Option<ProfileAction>,
    },
    /// Ask the backend to renew its Spotify token
    SpotifyRefresh,
}

#[derive(Subcommand, Clone)]
pub enum RecommendAction {
    /// List past recommendations
    List,
    /// Show one recommendation with explanations
    Show { id: i64 },
    /// Generate a new recommendation (can take up to two minutes)
    Generate {
        /// How you feel / what you are doing, e.g. "rainy day, studying"
        #[arg(num_args = 1.., trailing_var_arg = true)]
        context: Vec<String>,
    },
}

#[derive(Subcommand, Clone)]
pub enum ProfileAction {
    /// Show the profile (default)
    Show,
    /// Update profile fields; omitted flags stay unchanged
    Update {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        display_name: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        /// UI theme (light, dark)
        #[arg(long)]
        theme: Option<String>,
    },
    /// Upload a new profile picture
    Picture { path: String },
    /// Show favorite genres, or replace them with --set
    Genres {
        #[arg(long = "set", num_args = 1..)]
        set: Vec<String>,
    },
}

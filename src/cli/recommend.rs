// src/cli/recommend.rs — recommendations and dashboard commands

use crate::api::ShareTunesApi;
use crate::app::{Dashboard, LoadOutcome};
use crate::cli::display::{render_detail, render_profile, render_summary};
use crate::cli::RecommendAction;

pub async fn run_recommendations(api: &ShareTunesApi, action: RecommendAction) -> anyhow::Result<()> {
    match action {
        RecommendAction::List => {
            let list = api.recommendations.list().await?;
            if list.is_empty() {
                println!("No recommendations yet. Try `sharetunes rec generate <how you feel>`.");
            }
            for rec in &list {
                println!("{}", render_summary(rec));
            }
        }
        RecommendAction::Show { id } => {
            let rec = api.recommendations.get(id).await?;
            print!("{}", render_detail(&rec));
        }
        RecommendAction::Generate { context } => {
            let context = context.join(" ");
            eprintln!("Generating recommendations, this can take a while...");
            let rec = api
                .recommendations
                .generate(Some(&context))
                .await
                .map_err(|e| anyhow::anyhow!("Recommendation generation failed: {e}"))?;
            print!("{}", render_detail(&rec));
        }
    }
    Ok(())
}

pub async fn run_dashboard(api: &ShareTunesApi, generate: Option<String>) -> anyhow::Result<()> {
    let mut dashboard = Dashboard::new(api.clone());
    if dashboard.load().await == LoadOutcome::NotAuthenticated {
        anyhow::bail!("Not signed in. Run `sharetunes login` first.");
    }

    if let Some(profile) = dashboard.profile() {
        print!("{}", render_profile(profile));
        println!();
    }

    if let Some(context) = generate {
        dashboard.context = context;
        eprintln!("Generating recommendations, this can take a while...");
        if let Err(e) = dashboard.generate().await {
            // Keep showing the history we already have.
            eprintln!("Recommendation generation failed: {e}");
        }
    }

    if dashboard.recommendations().is_empty() {
        println!("No recommendations yet. Use --generate to ask for some.");
    }
    for rec in dashboard.recommendations() {
        println!("{}", render_summary(rec));
    }
    Ok(())
}

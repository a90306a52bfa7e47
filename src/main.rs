use std::{process, sync::Arc};

use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;
use verba::{
    application::{
        error::AppError,
        pagination::PageRequest,
        translations::{StoreTranslationService, TranslationService},
    },
    cache::{CacheConfig, CacheCoordinator, CacheKey, CachedTranslationService, PageKey, Region},
    config,
    domain::entities::TranslationDraft,
    infra::{memory::InMemoryTranslations, telemetry},
};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match cli_args.command.unwrap_or(config::Command::Config) {
        config::Command::Config => print_settings(&settings),
        config::Command::Verify(args) => run_verify(&settings, args).await,
    }
}

fn print_settings(settings: &config::Settings) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(&settings.to_json())
        .map_err(|err| AppError::unexpected(format!("failed to render settings: {err}")))?;
    println!("{rendered}");
    Ok(())
}

/// Runs the create → list → move-locale → list scenario and checks the cache after each step.
async fn run_verify(settings: &config::Settings, args: config::VerifyArgs) -> Result<(), AppError> {
    let cache_config = CacheConfig::from(&settings.cache);
    let coordinator = Arc::new(CacheCoordinator::in_memory(cache_config));
    let store = StoreTranslationService::new(Arc::new(InMemoryTranslations::new()));
    let service = CachedTranslationService::new(Arc::new(store), coordinator.clone());
    let enabled = cache_config.enabled;

    info!(enabled, recover_cold_state = cache_config.recover_cold_state, "verifying cache coherence");

    let created = service
        .create(TranslationDraft::new("app.title", "en", "Hello").with_tags(["ui"]))
        .await?;
    check(created.id == 1, "first translation should receive id 1")?;
    check(
        coordinator.cached_translation(created.id).is_some() == enabled,
        "created translation by-id entry",
    )?;

    let request = PageRequest::from_params(0, 10, "updatedAt", "desc");
    let english_key = PageKey::for_locale("en", &request);
    check(
        english_key.to_string() == "en_0_10_updatedAt_desc",
        "composite key rendering",
    )?;

    let listed = service.list_by_locale("en", &request).await?;
    check(listed.len() == 1, "english listing should hold one translation")?;
    check(
        coordinator.locale_index().keys_for("en").contains(&english_key) == enabled,
        "english page tracked under locale `en`",
    )?;

    let moved = service
        .update(
            created.id,
            TranslationDraft::new("app.title", "fr", "Bonjour").with_tags(["ui"]),
        )
        .await?;
    check(moved.locale == "fr", "update should move the translation to `fr`")?;
    if enabled {
        let cached_locale = coordinator
            .cached_translation(created.id)
            .map(|record| record.locale);
        check(
            cached_locale.as_deref() == Some("fr"),
            "by-id entry should reflect the new locale",
        )?;
    }
    check(
        coordinator.locale_index().keys_for("en").is_empty(),
        "english page untracked after the move",
    )?;
    check(
        coordinator
            .store()
            .get(Region::LocalePage, &CacheKey::Page(english_key.clone()))
            .is_none(),
        "english page evicted after the move",
    )?;

    match service.list_by_locale("en", &request).await {
        Err(err) if err.is_not_found() => {}
        Err(err) => return Err(err),
        Ok(items) => {
            return Err(AppError::unexpected(format!(
                "coherence violation: stale english listing returned {} rows",
                items.len()
            )));
        }
    }
    check(
        coordinator.locale_index().keys_for("en").is_empty()
            && coordinator.stats().entries_in(Region::LocalePage) == 0,
        "empty english listing must not be cached",
    )?;

    let stats = coordinator.stats();
    if args.json {
        let entries: serde_json::Map<String, serde_json::Value> = stats
            .entries
            .iter()
            .map(|(region, count)| (region.to_string(), serde_json::Value::from(*count)))
            .collect();
        let rendered = serde_json::json!({
            "enabled": enabled,
            "entries": entries,
            "tracked_partitions": stats.tracked_partitions,
            "tracked_keys": stats.tracked_keys,
        });
        println!("{rendered}");
    } else {
        println!("cache coherence verified (cache enabled: {enabled})");
        println!("{stats}");
    }
    coordinator.log_statistics();
    Ok(())
}

fn check(condition: bool, what: &str) -> Result<(), AppError> {
    if condition {
        Ok(())
    } else {
        Err(AppError::unexpected(format!("coherence violation: {what}")))
    }
}

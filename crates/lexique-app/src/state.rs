use std::sync::Arc;

use anyhow::Context;
use lexique_config::Config;
use lexique_core::{LookupService, PromptBuilder};
use lexique_lang_french::{FrenchProcessor, GeminiTranslator};
use lexique_store::WordStore;
use lexique_translator::normalizer_for;

use crate::signing::PayloadSigner;

/// Shared by every handler; nothing in here changes after start-up
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: WordStore,
    pub lookup: Arc<LookupService>,
    pub signer: Arc<PayloadSigner>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: WordStore,
        lookup: LookupService,
        signer: PayloadSigner,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store,
            lookup: Arc::new(lookup),
            signer: Arc::new(signer),
        }
    }

    /// Wire the Gemini client, French processor and SQLite store from config
    pub async fn build(config: Config) -> anyhow::Result<Self> {
        let store = WordStore::connect(&config.database)
            .await
            .with_context(|| format!("failed to open database {}", config.database.url))?;

        let prompts = PromptBuilder::from_config(&config.prompt).context("invalid prompt config")?;
        let translator = GeminiTranslator::from_config(&config.translator)
            .context("failed to build Gemini client")?;
        let normalizer = normalizer_for(config.translator.normalizer);

        tracing::info!(
            "Using {} with {} response normalizer",
            config.translator.model,
            normalizer.name()
        );

        let lookup = LookupService::new(
            Arc::new(FrenchProcessor::new()),
            prompts,
            Arc::new(translator),
            normalizer,
        );

        let signer = PayloadSigner::from_secret(&config.server.secret_key)?;

        Ok(Self::new(config, store, lookup, signer))
    }
}

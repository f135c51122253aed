use crate::config::AppConfig;
use anyhow::{Context as AnyhowContext, Result};
use verse_catalog::Catalog;
use verse_output::{resolve_output_path, AtomicWriter, OutputMailbox};
use verse_protocol::LookupError;
use verse_render::{Messages, VerseLookup};
use verse_search::KeywordSearch;
use verse_store::{BibleStore, JsonDirSource};

/// Everything a command needs: configuration, name tables, the verse store and messages.
pub struct CommandContext {
    pub config: AppConfig,
    pub catalog: Catalog,
    pub store: BibleStore,
    pub messages: Messages,
}

impl CommandContext {
    pub fn open(config: AppConfig) -> Result<Self> {
        let catalog = Catalog::load(&config.names_dir).with_context(|| {
            format!("Failed to load name tables from {}", config.names_dir.display())
        })?;
        let messages = Messages::load(&config.language, config.translations_dir.as_deref())
            .context("Failed to load translations")?;
        let store = BibleStore::new(JsonDirSource::new(&config.data_dir));
        log::debug!(
            "Opened data dir {} (language={}, reference_language={})",
            config.data_dir.display(),
            config.language,
            config.reference_language
        );
        Ok(Self::from_parts(config, catalog, store, messages))
    }

    pub fn from_parts(
        config: AppConfig,
        catalog: Catalog,
        store: BibleStore,
        messages: Messages,
    ) -> Self {
        Self {
            config,
            catalog,
            store,
            messages,
        }
    }

    pub fn lookup(&self) -> VerseLookup<'_> {
        VerseLookup::new(&self.catalog, &self.store, &self.messages)
            .with_reference_lang(&self.config.reference_language)
    }

    pub fn search(&self) -> KeywordSearch<'_> {
        KeywordSearch::new(&self.store).with_marker(self.config.highlight_marker())
    }

    pub fn mailbox(&self) -> verse_output::Result<OutputMailbox> {
        let mut settings = self.config.output_settings();
        let path = resolve_output_path(&mut settings)?;
        Ok(OutputMailbox::new(path).with_writer(AtomicWriter::new(self.config.retry_policy())))
    }

    /// Map each user token (id, label or CLI token) to a version id, dropping repeats.
    pub fn resolve_versions(&self, tokens: &[String]) -> Result<Vec<String>> {
        let mut versions: Vec<String> = Vec::with_capacity(tokens.len());
        for token in tokens {
            let version = self
                .catalog
                .resolve_version(token)
                .or_else(|| {
                    self.store
                        .available_versions(&self.catalog)
                        .into_iter()
                        .find(|version| version == token.trim())
                })
                .ok_or_else(|| LookupError::UnknownVersion(token.trim().to_string()))?;
            if !versions.contains(&version) {
                versions.push(version);
            }
        }
        Ok(versions)
    }

    pub fn resolve_version(&self, token: &str) -> Result<String> {
        let mut versions = self.resolve_versions(&[token.to_string()])?;
        versions
            .pop()
            .ok_or_else(|| LookupError::UnknownVersion(token.trim().to_string()).into())
    }
}

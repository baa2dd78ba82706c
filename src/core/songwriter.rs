/// The songwriter: source text in, verses out.
///
/// Wires together sentence splitting, index building and the batch driver,
/// and owns the seeded RNG so runs are reproducible.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::core::assembler::{AssemblyError, VerseAssembler, DEFAULT_RETRY_LIMIT};
use crate::core::batch::{write_batch, BatchReport, FailurePolicy};
use crate::core::corpus::split_sentences;
use crate::core::index::{BuildStats, IndexOptions, RhymeIndex};
use crate::core::rhymes::{DictionaryError, RhymeSource};
use crate::core::syllables::SyllableEstimator;
use crate::schema::scheme::VerseScheme;
use crate::schema::verse::Verse;

#[derive(Debug, Error)]
pub enum SongwriterError {
    #[error("assembly error: {0}")]
    Assembly(#[from] AssemblyError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("dictionary error: {0}")]
    Dictionary(#[from] DictionaryError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("source text contains no candidate lines")]
    EmptyCorpus,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("retry_limit must be at least 1")]
    ZeroRetryLimit,
    #[error("invalid scheme: {0}")]
    Scheme(String),
}

fn default_retry_limit() -> u32 {
    DEFAULT_RETRY_LIMIT
}

fn default_verses() -> usize {
    4
}

fn default_fold_case() -> bool {
    true
}

/// Everything a generation run needs besides the source text and the collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongConfig {
    #[serde(default)]
    pub scheme: VerseScheme,
    #[serde(default = "default_retry_limit")]
    pub retry_limit: u32,
    #[serde(default = "default_verses")]
    pub verses: usize,
    #[serde(default = "default_fold_case")]
    pub fold_case: bool,
    /// Drop lines that fit no meter slot before looking up their rhymes.
    #[serde(default)]
    pub prefilter: bool,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

impl Default for SongConfig {
    fn default() -> Self {
        Self {
            scheme: VerseScheme::default(),
            retry_limit: default_retry_limit(),
            verses: default_verses(),
            fold_case: default_fold_case(),
            prefilter: false,
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl SongConfig {
    /// Load a config from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<SongConfig, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse and validate a config from a RON string.
    pub fn parse_ron(input: &str) -> Result<SongConfig, ConfigError> {
        let config: SongConfig = ron::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retry_limit == 0 {
            return Err(ConfigError::ZeroRetryLimit);
        }
        self.scheme.validate().map_err(ConfigError::Scheme)
    }

    fn index_options(&self) -> IndexOptions {
        IndexOptions {
            fold_case: self.fold_case,
            prefilter: self.prefilter.then(|| self.scheme.clone()),
        }
    }
}

/// The top-level verse generator. Built via `Songwriter::builder()`.
///
/// The rhyme index is built once in `SongwriterBuilder::build` and only read
/// afterwards.
pub struct Songwriter {
    index: RhymeIndex,
    stats: BuildStats,
    config: SongConfig,
    rng: StdRng,
}

/// Builder for constructing a `Songwriter`.
pub struct SongwriterBuilder {
    config: SongConfig,
    seed: u64,
}

impl Songwriter {
    pub fn builder() -> SongwriterBuilder {
        SongwriterBuilder {
            config: SongConfig::default(),
            seed: 0,
        }
    }

    pub fn index(&self) -> &RhymeIndex {
        &self.index
    }

    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    pub fn config(&self) -> &SongConfig {
        &self.config
    }

    /// Reseed the generator without rebuilding the index.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Assemble a single verse.
    pub fn write_verse(&mut self) -> Result<Verse, SongwriterError> {
        let assembler = VerseAssembler::new(&self.index, &self.config.scheme)
            .retry_limit(self.config.retry_limit);
        Ok(assembler.assemble(&mut self.rng)?)
    }

    /// Assemble `count` verses under the configured failure policy.
    pub fn write_verses(&mut self, count: usize) -> Result<BatchReport, SongwriterError> {
        let assembler = VerseAssembler::new(&self.index, &self.config.scheme)
            .retry_limit(self.config.retry_limit);
        let report = write_batch(&assembler, count, self.config.failure_policy, &mut self.rng)?;
        info!(
            "wrote {} of {} verses",
            report.verses.len(),
            report.requested()
        );
        Ok(report)
    }

    /// Assemble as many verses as the config asks for.
    pub fn write_configured(&mut self) -> Result<BatchReport, SongwriterError> {
        self.write_verses(self.config.verses)
    }
}

impl SongwriterBuilder {
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn scheme(mut self, scheme: VerseScheme) -> Self {
        self.config.scheme = scheme;
        self
    }

    pub fn retry_limit(mut self, limit: u32) -> Self {
        self.config.retry_limit = limit;
        self
    }

    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.config.failure_policy = policy;
        self
    }

    pub fn fold_case(mut self, fold: bool) -> Self {
        self.config.fold_case = fold;
        self
    }

    pub fn prefilter(mut self, enabled: bool) -> Self {
        self.config.prefilter = enabled;
        self
    }

    /// Replace every setting with those of `config`.
    pub fn with_config(mut self, config: SongConfig) -> Self {
        self.config = config;
        self
    }

    /// Load settings from a RON config file.
    pub fn config_file(self, path: &Path) -> Result<Self, SongwriterError> {
        let config = SongConfig::load_from_ron(path)?;
        Ok(self.with_config(config))
    }

    /// Split `text` into candidate lines and index them.
    pub fn build<E, R>(
        self,
        text: &str,
        estimator: &E,
        rhymes: &R,
    ) -> Result<Songwriter, SongwriterError>
    where
        E: SyllableEstimator + ?Sized,
        R: RhymeSource + ?Sized,
    {
        self.config.validate()?;

        let sentences = split_sentences(text);
        if sentences.iter().all(|s| s.trim().is_empty()) {
            return Err(SongwriterError::EmptyCorpus);
        }
        info!(
            "{} candidate sentences ({} duplicates discarded)",
            sentences.len(),
            sentences.duplicates
        );

        let (index, stats) = RhymeIndex::build(
            sentences.iter(),
            estimator,
            rhymes,
            self.config.index_options(),
        );

        Ok(Songwriter {
            index,
            stats,
            config: self.config,
            rng: StdRng::seed_from_u64(self.seed),
        })
    }

    /// Read the source text from a file, then `build`.
    pub fn build_from_file<E, R>(
        self,
        path: &Path,
        estimator: &E,
        rhymes: &R,
    ) -> Result<Songwriter, SongwriterError>
    where
        E: SyllableEstimator + ?Sized,
        R: RhymeSource + ?Sized,
    {
        let text = std::fs::read_to_string(path)?;
        self.build(&text, estimator, rhymes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rhymes::PronouncingDictionary;
    use crate::core::syllables::HeuristicSyllables;

    const DICT: &str = "\
sat S AE1 T
rat R AE1 T
cat K AE1 T
day D EY1
way W EY1
";

    const TEXT: &str = "A cat sat. The fat rat! We sang all day, we went our way. The dog barks.";

    #[test]
    fn builds_and_writes() {
        let dict = PronouncingDictionary::parse(DICT).unwrap();
        let mut writer = Songwriter::builder()
            .seed(42)
            .scheme(VerseScheme::from_pattern("ABAB", &[("A", 3), ("B", 4)], 0))
            .build(TEXT, &HeuristicSyllables, &dict)
            .unwrap();

        assert_eq!(writer.index().len(), 4);
        assert_eq!(writer.stats().unrhymable, 1);

        let report = writer.write_verses(2).unwrap();
        assert_eq!(report.verses.len(), 2);
        for verse in &report.verses {
            assert_eq!(verse.len(), 4);
        }
    }

    #[test]
    fn capitalized_endings_fold_by_default() {
        let dict = PronouncingDictionary::parse(DICT).unwrap();
        let writer = Songwriter::builder()
            .build("Then came the Day. Some Way.", &HeuristicSyllables, &dict)
            .unwrap();
        assert!(writer.index().contains("day"));
        assert!(writer.index().contains("way"));
    }

    #[test]
    fn empty_corpus_is_config_error() {
        let dict = PronouncingDictionary::new();
        let result = Songwriter::builder().build(" ,. \n", &HeuristicSyllables, &dict);
        assert!(matches!(result, Err(SongwriterError::EmptyCorpus)));
    }

    #[test]
    fn unrhymable_corpus_fails_at_assembly() {
        let dict = PronouncingDictionary::new();
        let mut writer = Songwriter::builder()
            .build("nothing here rhymes", &HeuristicSyllables, &dict)
            .unwrap();
        let err = writer.write_verses(1).unwrap_err();
        assert!(matches!(
            err,
            SongwriterError::Assembly(AssemblyError::EmptyIndex)
        ));
    }

    #[test]
    fn zero_retry_limit_rejected() {
        let dict = PronouncingDictionary::new();
        let result = Songwriter::builder()
            .retry_limit(0)
            .build(TEXT, &HeuristicSyllables, &dict);
        assert!(matches!(
            result,
            Err(SongwriterError::Config(ConfigError::ZeroRetryLimit))
        ));
    }

    #[test]
    fn config_defaults_from_ron() {
        let config = SongConfig::parse_ron("(verses: 2)").unwrap();
        assert_eq!(config.verses, 2);
        assert_eq!(config.retry_limit, DEFAULT_RETRY_LIMIT);
        assert_eq!(config.scheme, VerseScheme::ballad());
        assert!(config.fold_case);
        assert_eq!(config.failure_policy, FailurePolicy::Skip);
    }

    #[test]
    fn config_with_scheme_from_ron() {
        let config = SongConfig::parse_ron(
            r#"(
                scheme: (
                    padding: 2,
                    meter: {"A": 7, "B": 5},
                    lines: [
                        (meter: "A", rhyme: "A"),
                        (meter: "B", rhyme: "B"),
                        (meter: "A", rhyme: "A"),
                        (meter: "B", rhyme: "B"),
                    ],
                ),
                retry_limit: 200,
                failure_policy: Abort,
            )"#,
        )
        .unwrap();
        assert_eq!(config.scheme.padding, 2);
        assert_eq!(config.scheme.target_at(1), Some(5));
        assert_eq!(config.retry_limit, 200);
        assert_eq!(config.failure_policy, FailurePolicy::Abort);
    }

    #[test]
    fn config_rejects_unknown_meter() {
        let result = SongConfig::parse_ron(
            r#"(scheme: (meter: {"A": 7}, lines: [(meter: "Z", rhyme: "A")]))"#,
        );
        assert!(matches!(result, Err(ConfigError::Scheme(_))));
    }

    #[test]
    fn reseed_repeats_output() {
        let dict = PronouncingDictionary::parse(DICT).unwrap();
        let mut writer = Songwriter::builder()
            .seed(7)
            .scheme(VerseScheme::from_pattern("AA", &[("A", 3)], 0))
            .build(TEXT, &HeuristicSyllables, &dict)
            .unwrap();
        let first = writer.write_verse().unwrap();
        writer.reseed(7);
        let second = writer.write_verse().unwrap();
        assert_eq!(first, second);
    }
}

use std::collections::BTreeMap;

use super::coerce::{coerce, parse_flag, parse_integer, ConfigValue};
use super::schema::{self, keys, KeySpec, Preprocess, Requirement, Schema, ValueKind};
use super::source::RawEnvironment;
use crate::domain::models::{
    AppEnv, AuthConfig, CacheConfig, ClientConfig, ConfigSnapshot, DatabaseConfig, EmailConfig,
    FeatureFlags, IntegrationConfig, LogLevel, NodeEnv, ObservabilityConfig, RuntimeConfig,
    Secret, ServerConfig, StorageConfig, TenancyConfig,
};
use crate::domain::{ConfigError, IssueReason, ValidationIssue};

/// Options controlling a load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Bypass all checks and coerce best-effort; never fails
    pub skip_validation: bool,
    /// Treat `""` as if the variable were unset
    pub empty_string_as_undefined: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            skip_validation: false,
            empty_string_as_undefined: true,
        }
    }
}

impl LoadOptions {
    /// Defaults, with validation skipped when `SKIP_ENV_VALIDATION` is set
    /// to anything non-empty
    pub fn from_environment(raw: &RawEnvironment) -> Self {
        Self {
            skip_validation: raw.is_set(schema::SKIP_ENV_VALIDATION),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn skip_validation(mut self, skip: bool) -> Self {
        self.skip_validation = skip;
        self
    }
}

/// Coerced values for one schema, keyed by variable name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedValues {
    values: BTreeMap<&'static str, ConfigValue>,
}

impl ResolvedValues {
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ConfigValue::as_text)
    }

    fn string(&self, key: &str) -> Option<String> {
        self.text(key).map(str::to_string)
    }

    fn secret(&self, key: &str) -> Option<Secret> {
        self.string(key).map(Secret::from)
    }

    /// Text value, falling back to the declared default
    fn text_or_default(&self, key: &str) -> String {
        self.string(key)
            .or_else(|| declared_default(key).map(str::to_string))
            .unwrap_or_default()
    }

    /// Flag value, falling back to the declared default
    pub fn flag(&self, key: &str) -> bool {
        self.get(key)
            .and_then(ConfigValue::as_flag)
            .unwrap_or_else(|| declared_default(key).is_some_and(parse_flag))
    }

    /// Integer value, falling back to the declared default
    pub fn integer(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(ConfigValue::as_integer).or_else(|| {
            declared_default(key).and_then(|default| parse_integer(default, u64::MAX).ok())
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ConfigValue)> {
        self.values.iter().map(|(key, value)| (*key, value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn declared_default(key: &str) -> Option<&'static str> {
    schema::lookup(key).and_then(|(_, spec)| spec.default_value())
}

/// Output of both schemas, before it is frozen into a snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub server: ResolvedValues,
    pub client: ResolvedValues,
    pub validation_skipped: bool,
}

impl Resolved {
    pub fn snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot::new(
            build_server(&self.server),
            build_client(&self.client),
            self.validation_skipped,
        )
    }
}

/// Environment configuration loader.
///
/// Validation is all-or-nothing: every issue across both schemas is
/// collected and reported together, and no snapshot is produced unless
/// there are none.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Validate `raw` and build the snapshot
    pub fn load(raw: &RawEnvironment, options: &LoadOptions) -> Result<ConfigSnapshot, ConfigError> {
        let resolved = Self::resolve(raw, options)?;
        let snapshot = resolved.snapshot();

        let runtime = snapshot.server().runtime;
        tracing::info!(
            node_env = %runtime.node_env,
            app_env = %runtime.app_env,
            validation_skipped = snapshot.validation_skipped(),
            "configuration loaded"
        );

        Ok(snapshot)
    }

    /// Load from the process environment, honoring `SKIP_ENV_VALIDATION`
    pub fn from_process() -> Result<ConfigSnapshot, ConfigError> {
        let raw = RawEnvironment::from_process();
        Self::load(&raw, &LoadOptions::from_environment(&raw))
    }

    /// Resolve both schemas without building typed sections
    pub fn resolve(raw: &RawEnvironment, options: &LoadOptions) -> Result<Resolved, ConfigError> {
        let ctx = Context::new(raw, options);

        if options.skip_validation {
            tracing::warn!("environment validation skipped");
            return Ok(Resolved {
                server: ctx.resolve_lenient(&Schema::SERVER),
                client: ctx.resolve_lenient(&Schema::CLIENT),
                validation_skipped: true,
            });
        }

        let mut issues = Vec::new();
        let server = ctx.resolve_strict(&Schema::SERVER, &mut issues);
        let client = ctx.resolve_strict(&Schema::CLIENT, &mut issues);

        if !issues.is_empty() {
            for issue in &issues {
                tracing::error!(key = issue.key, reason = %issue.reason, "invalid environment variable");
            }
            return Err(ConfigError::Validation { issues });
        }

        Ok(Resolved {
            server,
            client,
            validation_skipped: false,
        })
    }
}

struct Context<'a> {
    raw: &'a RawEnvironment,
    options: &'a LoadOptions,
    production: bool,
}

impl<'a> Context<'a> {
    fn new(raw: &'a RawEnvironment, options: &'a LoadOptions) -> Self {
        let mut ctx = Self {
            raw,
            options,
            production: false,
        };
        ctx.production = ctx
            .present(keys::NODE_ENV)
            .and_then(NodeEnv::from_name)
            .is_some_and(NodeEnv::is_production);
        ctx
    }

    /// Raw value after empty-string normalization
    fn present(&self, key: &str) -> Option<&'a str> {
        self.raw
            .get(key)
            .filter(|value| !(self.options.empty_string_as_undefined && value.is_empty()))
    }

    /// Normalized value after preprocessing
    fn input(&self, spec: &KeySpec) -> Option<&'a str> {
        match spec.preprocess {
            Some(Preprocess::FallbackTo(other)) => {
                self.present(spec.key).or_else(|| self.present(other))
            }
            None => self.present(spec.key),
        }
    }

    fn coerce(&self, kind: ValueKind, value: &str) -> Result<ConfigValue, IssueReason> {
        coerce(kind, value, |marker| self.raw.is_set(marker))
    }

    fn resolve_key(&self, spec: &KeySpec) -> Result<Option<ConfigValue>, IssueReason> {
        let Some(value) = self.input(spec) else {
            return match spec.requirement {
                Requirement::Default(default) => self.coerce(spec.kind, default).map(Some),
                Requirement::Required => Err(IssueReason::Missing),
                Requirement::RequiredInProduction if self.production => Err(IssueReason::Missing),
                Requirement::RequiredInProduction | Requirement::Optional => Ok(None),
            };
        };

        match self.coerce(spec.kind, value) {
            Ok(coerced) => Ok(Some(coerced)),
            // An optional integer that does not parse is simply absent
            Err(IssueReason::InvalidInteger) if spec.requirement == Requirement::Optional => {
                tracing::warn!(key = spec.key, "ignoring non-numeric value");
                Ok(None)
            }
            Err(reason) => Err(reason),
        }
    }

    fn resolve_strict(&self, schema: &Schema, issues: &mut Vec<ValidationIssue>) -> ResolvedValues {
        let mut values = BTreeMap::new();
        for spec in schema.keys {
            match self.resolve_key(spec) {
                Ok(Some(value)) => {
                    values.insert(spec.key, value);
                }
                Ok(None) => {}
                Err(reason) => issues.push(ValidationIssue::new(spec.key, reason)),
            }
        }
        ResolvedValues { values }
    }

    fn resolve_lenient(&self, schema: &Schema) -> ResolvedValues {
        let mut values = BTreeMap::new();
        for spec in schema.keys {
            if let Some(value) = self.best_effort(spec) {
                values.insert(spec.key, value);
            }
        }
        ResolvedValues { values }
    }

    /// Unparseable text is kept as given; anything else falls back to the
    /// default, or to absent.
    fn best_effort(&self, spec: &KeySpec) -> Option<ConfigValue> {
        if let Ok(value) = self.resolve_key(spec) {
            return value;
        }

        match (spec.kind, self.input(spec)) {
            (ValueKind::Url | ValueKind::UrlUnlessPlatform(_) | ValueKind::Email, Some(raw)) => {
                Some(ConfigValue::Text(raw.to_string()))
            }
            _ => spec
                .default_value()
                .and_then(|default| self.coerce(spec.kind, default).ok()),
        }
    }
}

fn build_server(values: &ResolvedValues) -> ServerConfig {
    let runtime = RuntimeConfig {
        node_env: values
            .text(keys::NODE_ENV)
            .and_then(NodeEnv::from_name)
            .unwrap_or_default(),
        app_env: values
            .text(keys::APP_ENV)
            .and_then(AppEnv::from_name)
            .unwrap_or_default(),
        log_level: values
            .text(keys::LOG_LEVEL)
            .and_then(LogLevel::from_name)
            .unwrap_or_default(),
    };

    ServerConfig {
        runtime,
        database: DatabaseConfig {
            url: values.string(keys::DATABASE_URL),
            direct_url: values.string(keys::DATABASE_DIRECT_URL),
        },
        auth: AuthConfig {
            secret: values.secret(keys::NEXTAUTH_SECRET),
            url: values.string(keys::NEXTAUTH_URL),
        },
        cache: CacheConfig {
            redis_url: values.string(keys::REDIS_URL),
        },
        storage: StorageConfig {
            endpoint: values.string(keys::S3_ENDPOINT),
            access_key: values.secret(keys::S3_ACCESS_KEY),
            secret_key: values.secret(keys::S3_SECRET_KEY),
            bucket_name: values.string(keys::S3_BUCKET_NAME),
            region: values.text_or_default(keys::S3_REGION),
        },
        tenancy: TenancyConfig {
            default_tenant_id: values.string(keys::DEFAULT_TENANT_ID),
            multi_tenant: values.flag(keys::ENABLE_MULTI_TENANT),
        },
        features: FeatureFlags {
            ai_features: values.flag(keys::ENABLE_AI_FEATURES),
            external_api_sync: values.flag(keys::ENABLE_EXTERNAL_API_SYNC),
            audit_logging: values.flag(keys::ENABLE_AUDIT_LOGGING),
        },
        integration: IntegrationConfig {
            internal_api_base_url: values.string(keys::INTERNAL_API_BASE_URL),
            internal_api_key: values.secret(keys::INTERNAL_API_KEY),
            polling_interval_minutes: values
                .integer(keys::POLLING_INTERVAL_MINUTES)
                .and_then(|minutes| u32::try_from(minutes).ok())
                .unwrap_or_default(),
        },
        email: EmailConfig {
            from: values.string(keys::EMAIL_FROM),
            smtp_host: values.string(keys::SMTP_HOST),
            smtp_port: values
                .integer(keys::SMTP_PORT)
                .and_then(|port| u16::try_from(port).ok()),
            smtp_user: values.string(keys::SMTP_USER),
            smtp_password: values.secret(keys::SMTP_PASSWORD),
        },
        observability: ObservabilityConfig {
            metrics_enabled: values.flag(keys::ENABLE_METRICS),
            sentry_dsn: values.string(keys::SENTRY_DSN),
        },
    }
}

fn build_client(values: &ResolvedValues) -> ClientConfig {
    ClientConfig {
        app_name: values.text_or_default(keys::NEXT_PUBLIC_APP_NAME),
        app_version: values.text_or_default(keys::NEXT_PUBLIC_APP_VERSION),
        analytics_enabled: values.flag(keys::NEXT_PUBLIC_ENABLE_ANALYTICS),
    }
}

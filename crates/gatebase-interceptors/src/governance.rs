use crate::config::GovernanceConfig;
use crate::csrf::{memory::MemoryCsrfStore, CsrfStore};
use crate::errors::InterceptError;
use crate::stages::{
    authn::AuthnAnnotateStage, correlation::CorrelationStage, csrf_guard::CsrfStage,
    logging::LoggingStage, rate_limit::RateLimitStage, InterceptorChain,
};
use gatebase_auth::prelude::*;
use gatebase_types::prelude::Subject;
use std::sync::Arc;

/// Owns all governance state for one process: token codec, rate gates, CSRF
/// store, the assembled chain, and the background sweepers, which are
/// aborted when the instance is dropped.
pub struct Governance {
    codec: Arc<TokenCodec>,
    limiter: Arc<MethodRateLimiter>,
    csrf: Arc<MemoryCsrfStore>,
    chain: InterceptorChain,
    _sweepers: Vec<SweeperHandle>,
}

impl Governance {
    pub fn new(config: &GovernanceConfig) -> Result<Self, InterceptError> {
        config.validate()?;

        let codec = Arc::new(
            TokenCodec::new(
                config.auth.secret.clone(),
                config.auth.access_ttl(),
                config.auth.refresh_ttl(),
                config.auth.issuer.clone(),
            )
            .map_err(|err| InterceptError::from_error(err.into_inner()))?,
        );

        let mut limiter = MethodRateLimiter::new(config.rate.capacity, config.rate.window());
        for limit in &config.rate.overrides {
            limiter = limiter.with_method_limit(limit.method.clone(), limit.capacity, limit.window());
        }
        let limiter = Arc::new(limiter);

        let csrf = Arc::new(
            MemoryCsrfStore::new(config.csrf.ttl()).with_single_use(config.csrf.single_use),
        );

        let mut sweepers = limiter.spawn_sweepers();
        sweepers.push(csrf.spawn_sweeper());

        let chain = InterceptorChain::new(vec![
            Box::new(CorrelationStage),
            Box::new(AuthnAnnotateStage {
                codec: codec.clone(),
            }),
            Box::new(RateLimitStage {
                gate: limiter.clone(),
            }),
            Box::new(CsrfStage::new(
                csrf.clone(),
                config.csrf.protected_methods.iter().cloned(),
            )),
            Box::new(LoggingStage),
        ]);

        Ok(Self {
            codec,
            limiter,
            csrf,
            chain,
            _sweepers: sweepers,
        })
    }

    pub fn from_env() -> Result<Self, InterceptError> {
        Self::new(&GovernanceConfig::from_env()?)
    }

    pub fn chain(&self) -> &InterceptorChain {
        &self.chain
    }

    pub fn codec(&self) -> &Arc<TokenCodec> {
        &self.codec
    }

    pub fn limiter(&self) -> &Arc<MethodRateLimiter> {
        &self.limiter
    }

    pub async fn issue_csrf(&self, subject: &Subject) -> Result<String, InterceptError> {
        self.csrf.issue(&subject.subject_id.0).await
    }

    pub async fn invalidate_csrf(&self, token: &str) {
        self.csrf.invalidate(token).await
    }
}

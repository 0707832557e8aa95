//! Turning [`RewriterSpec`]s into live rewriters.

use crate::config::types::{ResolvedConfig, RewriterSpec};
use crate::pipeline::BatchPipeline;
use crate::rewrite::{
    ImageSyntaxRewriter, PatternRewriter, Rewriter, RewriterBuildError, SectionWrapRewriter,
    SlugRewriter,
};
use crate::slug::{CompletionSlugProvider, LocalSlugProvider, SlugProvider};

/// Construct rewriters in configuration order.
///
/// With `offline` set, slug rewriters use [`LocalSlugProvider`] instead of the
/// completions endpoint, so no API key is needed.
pub fn build_rewriters(
    specs: &[RewriterSpec],
    offline: bool,
) -> Result<Vec<Box<dyn Rewriter>>, RewriterBuildError> {
    specs.iter().map(|spec| build_one(spec, offline)).collect()
}

fn build_one(spec: &RewriterSpec, offline: bool) -> Result<Box<dyn Rewriter>, RewriterBuildError> {
    let rewriter: Box<dyn Rewriter> = match spec {
        RewriterSpec::Pattern(p) => Box::new(PatternRewriter::from_pairs(&p.rules)?),
        RewriterSpec::Image(opts) => Box::new(ImageSyntaxRewriter::new(opts.clone())),
        RewriterSpec::Slug(s) => {
            let provider: Box<dyn SlugProvider> = if offline {
                Box::new(LocalSlugProvider)
            } else {
                Box::new(CompletionSlugProvider::from_env(&s.provider, &s.model)?)
            };
            Box::new(SlugRewriter::new(&s.prefix, provider))
        }
        RewriterSpec::Wrap(opts) => Box::new(SectionWrapRewriter::new(opts.clone())),
    };
    Ok(rewriter)
}

/// Build a ready-to-run pipeline for the active profile.
pub fn build_pipeline(
    rc: &ResolvedConfig,
    offline: bool,
) -> Result<BatchPipeline, RewriterBuildError> {
    let rewriters = build_rewriters(&rc.rewriters, offline)?;
    let pipeline = rewriters
        .into_iter()
        .fold(BatchPipeline::new(rc.root.clone()).with_filter(rc.filter.clone()), |p, r| {
            p.add_rewriter(r)
        });
    Ok(pipeline)
}

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

/// Numbered candidates tried before falling back to a random suffix.
pub const MAX_SLUG_ATTEMPTS: usize = 100;

const FALLBACK_SLUG: &str = "untitled";

static NON_ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("slug pattern is valid"));

/// Derive a URL-safe slug from free text.
///
/// Lowercases, collapses every run of characters outside `[a-z0-9]` into a
/// single hyphen and trims hyphens from both ends. Text with no usable
/// characters yields `"untitled"`.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let slug = NON_ALPHANUMERIC.replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug.to_string()
    }
}

/// Candidate slugs in the order they are tried: `base`, `base-1`, `base-2`, ...
///
/// Yields [`MAX_SLUG_ATTEMPTS`] candidates in total.
pub fn candidates(base: &str) -> impl Iterator<Item = String> + '_ {
    std::iter::once(base.to_string())
        .chain((1..MAX_SLUG_ATTEMPTS).map(move |n| format!("{}-{}", base, n)))
}

/// Whether `slug` is one of the numbered candidates for `source`, so a
/// rename to `source` can keep it.
pub fn is_candidate_for(slug: &str, source: &str) -> bool {
    candidates(&slugify(source)).any(|candidate| candidate == slug)
}

/// Slug with a random suffix, used once the numbered candidates run out.
pub fn random_suffixed(base: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", base, &suffix[..8])
}

/// Capability to check whether a slug is already taken.
#[async_trait]
pub trait SlugChecker: Send + Sync {
    type Error: Send;

    async fn slug_exists(&self, slug: &str) -> Result<bool, Self::Error>;
}

/// Generate a slug for `source` that the checker reports as free.
///
/// After [`MAX_SLUG_ATTEMPTS`] collisions a random suffix is returned
/// without a further check; the storage unique index remains the final
/// arbiter.
pub async fn generate_unique_slug<C>(checker: &C, source: &str) -> Result<String, C::Error>
where
    C: SlugChecker + ?Sized,
{
    let base = slugify(source);

    for candidate in candidates(&base) {
        if !checker.slug_exists(&candidate).await? {
            return Ok(candidate);
        }
    }

    Ok(random_suffixed(&base))
}

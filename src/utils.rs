use chrono::{DateTime, FixedOffset, Local, SubsecRound};
use sqlx::SqlitePool;
use url::Url;

pub(crate) async fn is_table_exists(
    pool: &SqlitePool,
    table_name: &str,
) -> Result<bool, sqlx::Error> {
    Ok(
        sqlx::query("SELECT name FROM sqlite_master WHERE type='table' AND name = ?")
            .bind(table_name)
            .fetch_optional(pool)
            .await?
            .is_some(),
    )
}

/// Local wall-clock time, truncated to milliseconds.
pub(crate) fn get_now() -> DateTime<FixedOffset> {
    DateTime::<FixedOffset>::from(Local::now()).trunc_subsecs(3)
}

/// Resolves `href` against `base` (when relative) and drops the query string and
/// fragment, yielding the canonical profile identifier.
pub(crate) fn canonical_profile_url(href: &str, base: Option<&Url>) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let mut url = match (Url::parse(href), base) {
        (Ok(url), _) => url,
        (Err(url::ParseError::RelativeUrlWithoutBase), Some(base)) => base.join(href).ok()?,
        (Err(_), _) => return None,
    };
    if url.cannot_be_a_base() {
        return None;
    }

    url.set_query(None);
    url.set_fragment(None);
    Some(url.to_string())
}

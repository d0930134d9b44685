//! Search planning and the fluent search builder.
//!
//! A search is answered entirely from `.nozomi` lists: one list per tag, one
//! for the category value, one for the art type. The lists of one
//! [`direct`] search are fetched concurrently and intersected. When several
//! categories are given (say artist *and* series), each gets its own direct
//! search with the same tags, and those results are intersected in turn.
//!
//! # Examples
//!
//! ```rust,no_run
//! use hitomi::prelude::*;
//! # use hitomi::error::Result;
//!
//! # async fn example() -> Result<()> {
//! let client = Hitomi::new();
//!
//! let ids = client
//!     .query()
//!     .artist("foo")
//!     .tag("female:glasses")
//!     .art_type(ArtType::Doujinshi)
//!     .language("english")
//!     .execute()
//!     .await?;
//!
//! println!("{} galleries", ids.len());
//! # Ok(())
//! # }
//! ```

use futures::future;
use tracing::debug;

use crate::{
    error::{Error, Result},
    intersect::intersect,
    net::Transport,
    nozomi,
    types::{ArtType, Category, SearchFilter, SearchParams, SortedIdList},
};

/// Runs a complete search.
///
/// # Errors
///
/// * [`Error::NotFound`] - If any tag, category value, or art type list does not exist
/// * [`Error::InvalidQuery`] - If the request names no filter at all
/// * Transport and decoding errors from [`nozomi::fetch_ids`]
pub async fn search<T>(transport: &T, params: &SearchParams) -> Result<SortedIdList>
where
    T: Transport + ?Sized,
{
    let categories = params.categories();

    if categories.is_empty() {
        return direct(
            transport,
            None,
            None,
            params.art_type,
            &params.tags,
            &params.language,
        )
        .await;
    }

    let mut per_category = Vec::with_capacity(categories.len());
    for (category, value) in categories {
        let ids = direct(
            transport,
            Some(category),
            Some(value),
            params.art_type,
            &params.tags,
            &params.language,
        )
        .await?;
        debug!(%category, value, count = ids.len(), "category search done");
        per_category.push(ids);
    }

    intersect(per_category)
}

/// Searches one category value (or none) combined with tags and art type.
///
/// # Errors
///
/// * [`Error::InvalidQuery`] - If `category` is given without `category_value`,
///   or no filter remains (no tags, no category, no art type)
/// * [`Error::NotFound`] - If one of the lists does not exist
pub async fn direct<T>(
    transport: &T,
    category: Option<Category>,
    category_value: Option<&str>,
    art_type: Option<ArtType>,
    tags: &[String],
    language: &str,
) -> Result<SortedIdList>
where
    T: Transport + ?Sized,
{
    let filters = plan_filters(category, category_value, art_type, tags)?;

    let lists = future::try_join_all(
        filters
            .iter()
            .map(|filter| nozomi::fetch_filter(transport, filter, language)),
    )
    .await?;

    intersect(lists)
}

/// Filters a direct search fetches, tags first.
fn plan_filters(
    category: Option<Category>,
    category_value: Option<&str>,
    art_type: Option<ArtType>,
    tags: &[String],
) -> Result<Vec<SearchFilter>> {
    let mut filters: Vec<SearchFilter> = tags
        .iter()
        .map(|tag| SearchFilter::Tag(tag.clone()))
        .collect();

    if let Some(category) = category {
        let value = category_value
            .ok_or_else(|| Error::invalid_query(format!("empty {} value", category)))?;
        filters.push(SearchFilter::Category(category, value.to_string()));
    }

    if let Some(art_type) = art_type {
        filters.push(SearchFilter::ArtType(art_type));
    }

    Ok(filters)
}

/// Fluent builder for a search against one transport.
///
/// Created by [`Hitomi::query`](crate::Hitomi::query). Tags added with
/// [`tag`](SearchBuilder::tag) replace the default `index` tag.
pub struct SearchBuilder<'a, T: Transport + ?Sized> {
    transport: &'a T,
    params: SearchParams,
    tags_set: bool,
}

impl<'a, T: Transport + ?Sized> SearchBuilder<'a, T> {
    pub(crate) fn new(transport: &'a T) -> Self {
        Self {
            transport,
            params: SearchParams::default(),
            tags_set: false,
        }
    }

    pub fn artist(mut self, artist: impl Into<String>) -> Self {
        self.params.artist = Some(artist.into());
        self
    }

    pub fn series(mut self, series: impl Into<String>) -> Self {
        self.params.series = Some(series.into());
        self
    }

    pub fn character(mut self, character: impl Into<String>) -> Self {
        self.params.character = Some(character.into());
        self
    }

    pub fn art_type(mut self, art_type: ArtType) -> Self {
        self.params.art_type = Some(art_type);
        self
    }

    /// Adds one tag to the search.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        if !self.tags_set {
            self.params.tags.clear();
            self.tags_set = true;
        }
        self.params.tags.push(tag.into());
        self
    }

    /// Replaces all tags.
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params.tags = tags.into_iter().map(Into::into).collect();
        self.tags_set = true;
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.params.language = language.into();
        self
    }

    /// Runs the search.
    pub async fn execute(self) -> Result<SortedIdList> {
        search(self.transport, &self.params).await
    }

    /// Returns the collected parameters without running the search.
    pub fn build(self) -> SearchParams {
        self.params
    }
}

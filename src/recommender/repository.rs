use std::fmt::{self, Debug, Display};
use std::hash::Hash;
use std::time::SystemTime;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Mean earth radius used for great-circle distances
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// User identifier; item hosts are users too
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        UserId(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        UserId(id.to_string())
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Latitude / longitude in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        GeoPoint { latitude, longitude }
    }

    /// Great-circle distance in kilometres (haversine)
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        // 点の順序を固定して a->b と b->a を完全に一致させる
        let (p, q) = if (self.latitude, self.longitude) <= (other.latitude, other.longitude) {
            (self, other)
        } else {
            (other, self)
        };
        let (lat1, lat2) = (p.latitude.to_radians(), q.latitude.to_radians());
        let d_lat = lat2 - lat1;
        let d_lon = (q.longitude - p.longitude).to_radians();
        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
    }

    /// Distance between two optional points; unknown locations are infinitely far apart
    pub fn distance_between(a: Option<&GeoPoint>, b: Option<&GeoPoint>) -> f64 {
        match (a, b) {
            (Some(a), Some(b)) => a.distance_km(b),
            _ => f64::INFINITY,
        }
    }
}

/// One catalog item ("event") as seen by the recommender
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item<K> {
    pub key: K,
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    pub host: Option<UserId>,
    pub location: Option<GeoPoint>,
    pub published: bool,
    pub ends_at: Option<SystemTime>,
}

impl<K> Item<K> {
    /// Published item without tags, categories, host or location
    pub fn new(key: K, name: impl Into<String>, description: impl Into<String>) -> Self {
        Item {
            key,
            name: name.into(),
            description: description.into(),
            tags: Vec::new(),
            categories: Vec::new(),
            host: None,
            location: None,
            published: true,
            ends_at: None,
        }
    }

    pub fn with_tags<T: AsRef<str>>(mut self, tags: &[T]) -> Self {
        self.tags = tags.iter().map(|t| t.as_ref().to_string()).collect();
        self
    }

    pub fn with_categories<T: AsRef<str>>(mut self, categories: &[T]) -> Self {
        self.categories = categories.iter().map(|c| c.as_ref().to_string()).collect();
        self
    }

    pub fn hosted_by(mut self, host: impl Into<UserId>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn located_at(mut self, location: GeoPoint) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_published(mut self, published: bool) -> Self {
        self.published = published;
        self
    }

    pub fn ending_at(mut self, ends_at: SystemTime) -> Self {
        self.ends_at = Some(ends_at);
        self
    }

    /// Text fed to the tokenizer: name followed by description
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.name, self.description)
    }

    /// Published and not finished before `now`
    pub fn is_recommendable(&self, now: SystemTime) -> bool {
        self.published && self.ends_at.map_or(true, |end| end >= now)
    }

    pub fn is_hosted_by(&self, user: &UserId) -> bool {
        self.host.as_ref() == Some(user)
    }
}

/// Item repository seam
///
/// Errors raised here reach the caller unchanged.
pub trait ItemRepository {
    type Key: Clone + Eq + Hash + Debug;

    /// Every live item, in a stable order
    fn live_items(&self) -> Result<Vec<Item<Self::Key>>>;

    fn item(&self, key: &Self::Key) -> Result<Option<Item<Self::Key>>>;

    /// Number of live items hosted by `host`
    fn host_item_count(&self, host: &UserId) -> Result<u64>;

    fn live_item_count(&self) -> Result<u64> {
        Ok(self.live_items()?.len() as u64)
    }

    /// Geographic distance between two items in kilometres,
    /// `f64::INFINITY` when either location is unknown
    fn distance(&self, a: &Item<Self::Key>, b: &Item<Self::Key>) -> f64 {
        GeoPoint::distance_between(a.location.as_ref(), b.location.as_ref())
    }
}

/// In-memory item catalog, iterated in insertion order
#[derive(Debug, Clone)]
pub struct MemoryItemRepository<K>
where
    K: Clone + Eq + Hash + Debug,
{
    items: IndexMap<K, Item<K>>,
}

impl<K> MemoryItemRepository<K>
where
    K: Clone + Eq + Hash + Debug,
{
    pub fn new() -> Self {
        Self { items: IndexMap::new() }
    }

    /// Insert or replace an item
    /// The corpus must be rebuilt afterwards for scores to reflect the change.
    pub fn upsert(&mut self, item: Item<K>) -> Option<Item<K>> {
        self.items.insert(item.key.clone(), item)
    }

    /// 順序を保って削除する
    pub fn remove(&mut self, key: &K) -> Option<Item<K>> {
        self.items.shift_remove(key)
    }

    pub fn get(&self, key: &K) -> Option<&Item<K>> {
        self.items.get(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut Item<K>> {
        self.items.get_mut(key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<K> Default for MemoryItemRepository<K>
where
    K: Clone + Eq + Hash + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> FromIterator<Item<K>> for MemoryItemRepository<K>
where
    K: Clone + Eq + Hash + Debug,
{
    fn from_iter<I: IntoIterator<Item = Item<K>>>(iter: I) -> Self {
        let mut repo = Self::new();
        iter.into_iter().for_each(|item| {
            repo.upsert(item);
        });
        repo
    }
}

impl<K> ItemRepository for MemoryItemRepository<K>
where
    K: Clone + Eq + Hash + Debug,
{
    type Key = K;

    fn live_items(&self) -> Result<Vec<Item<K>>> {
        Ok(self.items.values().cloned().collect())
    }

    fn item(&self, key: &K) -> Result<Option<Item<K>>> {
        Ok(self.items.get(key).cloned())
    }

    fn host_item_count(&self, host: &UserId) -> Result<u64> {
        Ok(self.items.values().filter(|item| item.is_hosted_by(host)).count() as u64)
    }

    fn live_item_count(&self) -> Result<u64> {
        Ok(self.items.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn haversine_known_distance() {
        // Sydney Opera House -> Melbourne Arts Centre, roughly 714 km
        let sydney = GeoPoint::new(-33.8568, 151.2153);
        let melbourne = GeoPoint::new(-37.8210, 144.9690);
        let d = sydney.distance_km(&melbourne);
        assert!((d - 714.0).abs() < 10.0, "got {d}");
        assert_eq!(sydney.distance_km(&sydney), 0.0);
        assert_eq!(d, melbourne.distance_km(&sydney));
    }

    #[test]
    fn unknown_location_is_infinitely_far() {
        let p = GeoPoint::new(0.0, 0.0);
        assert_eq!(GeoPoint::distance_between(Some(&p), None), f64::INFINITY);
        assert_eq!(GeoPoint::distance_between(None, None), f64::INFINITY);
    }

    #[test]
    fn recommendable_respects_publish_and_end() {
        let now = SystemTime::now();
        let item = Item::new(1, "gig", "");
        assert!(item.is_recommendable(now));
        assert!(!item.clone().with_published(false).is_recommendable(now));
        assert!(!item.clone().ending_at(now - Duration::from_secs(60)).is_recommendable(now));
        assert!(item.ending_at(now + Duration::from_secs(60)).is_recommendable(now));
    }

    #[test]
    fn host_item_count_counts_live_items() {
        let repo: MemoryItemRepository<u32> = [
            Item::new(1, "a", "").hosted_by("alice"),
            Item::new(2, "b", "").hosted_by("alice"),
            Item::new(3, "c", "").hosted_by("bob"),
        ]
        .into_iter()
        .collect();
        assert_eq!(repo.host_item_count(&UserId::from("alice")).unwrap(), 2);
        assert_eq!(repo.host_item_count(&UserId::from("carol")).unwrap(), 0);
    }
}

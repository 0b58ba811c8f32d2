//! Fallback query layer.
//!
//! One query operation per data domain. Every operation resolves to a
//! normalized, ordered record set: live backend rows when the read succeeds
//! with at least one record, the mock dataset otherwise. An empty-but-
//! successful read is deliberately treated the same as a failure: an empty
//! table looks broken to an end user, so the mock content is preferred over
//! a blank screen. The one exception is `karya`, which has no mock
//! counterpart; its reads surface errors and an empty list is a real state.
//!
//! Results are cached per `(domain, filter)` key and concurrent requesters
//! for one key share a single in-flight gateway call.

use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::error::{GatewayError, PortalError};
use crate::gateway::{DataGateway, Direction, SelectRequest};
use crate::model::{
    Domain, Donation, GalleryItem, Group, Karya, NewDonation, NewKarya, NewTask, OrgChartEntry,
    Quote, ScheduleEntry, Session, Sourced, Student, Task, WeekParity,
};
use crate::normalize;

/// Cache slot for one domain: a map from filter key to a shared once-cell.
/// `get_or_init` on the cell is what deduplicates concurrent fetches.
struct QuerySlot<K, V> {
    entries: Mutex<HashMap<K, Arc<OnceCell<Arc<V>>>>>,
}

impl<K: Eq + Hash + Clone, V> QuerySlot<K, V> {
    fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn is_cached(&self, key: &K) -> bool {
        self.entries
            .lock()
            .get(key)
            .map(|cell| cell.initialized())
            .unwrap_or(false)
    }

    fn cell(&self, key: K) -> Arc<OnceCell<Arc<V>>> {
        let mut entries = self.entries.lock();
        entries
            .entry(key)
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone()
    }

    async fn get_or_fetch<F, Fut>(&self, key: K, fetch: F) -> Arc<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V>,
    {
        self.cell(key)
            .get_or_init(|| async { Arc::new(fetch().await) })
            .await
            .clone()
    }

    /// Fallible variant: a failed fetch leaves the cell empty, so the next
    /// query retries instead of pinning the error.
    async fn get_or_try_fetch<F, Fut>(&self, key: K, fetch: F) -> Result<Arc<V>, PortalError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, PortalError>>,
    {
        self.cell(key)
            .get_or_try_init(|| async { fetch().await.map(Arc::new) })
            .await
            .map(Arc::clone)
    }

    fn invalidate_all(&self) {
        self.entries.lock().clear();
    }
}

/// Point-in-time cache counters, in the spirit of an operations snapshot.
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub operations: u64,
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        if self.operations == 0 {
            0.0
        } else {
            self.hits as f64 / self.operations as f64
        }
    }
}

/// Client facade over the remote gateway implementing the per-domain
/// fallback queries, the mutation calls, and cache invalidation.
pub struct PortalClient {
    gateway: Arc<dyn DataGateway>,
    students: QuerySlot<(), Sourced<Vec<Student>>>,
    schedules: QuerySlot<WeekParity, Sourced<Vec<ScheduleEntry>>>,
    tasks: QuerySlot<(), Sourced<Vec<Task>>>,
    donations: QuerySlot<(), Sourced<Vec<Donation>>>,
    groups: QuerySlot<(), Sourced<Vec<Group>>>,
    quotes: QuerySlot<(), Sourced<Vec<Quote>>>,
    gallery: QuerySlot<(), Sourced<Vec<GalleryItem>>>,
    org_chart: QuerySlot<(), Sourced<Vec<OrgChartEntry>>>,
    karya: QuerySlot<(), Vec<Karya>>,
    cache_ops: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
}

impl PortalClient {
    pub fn new(gateway: Arc<dyn DataGateway>) -> Self {
        Self {
            gateway,
            students: QuerySlot::new(),
            schedules: QuerySlot::new(),
            tasks: QuerySlot::new(),
            donations: QuerySlot::new(),
            groups: QuerySlot::new(),
            quotes: QuerySlot::new(),
            gallery: QuerySlot::new(),
            org_chart: QuerySlot::new(),
            karya: QuerySlot::new(),
            cache_ops: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            cache_misses: AtomicU64::new(0),
        }
    }

    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            operations: self.cache_ops.load(Ordering::Relaxed),
            hits: self.cache_hits.load(Ordering::Relaxed),
            misses: self.cache_misses.load(Ordering::Relaxed),
        }
    }

    fn count_lookup(&self, domain: Domain, cached: bool) {
        self.cache_ops.fetch_add(1, Ordering::Relaxed);
        if cached {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
            debug!(%domain, "cache hit");
        } else {
            self.cache_misses.fetch_add(1, Ordering::Relaxed);
            debug!(%domain, "cache miss");
        }
    }

    /// Drop the cached result(s) for one domain so the next query refetches.
    pub fn invalidate(&self, domain: Domain) {
        match domain {
            Domain::Students => self.students.invalidate_all(),
            Domain::Schedules => self.schedules.invalidate_all(),
            Domain::Tasks => self.tasks.invalidate_all(),
            Domain::Infaq => self.donations.invalidate_all(),
            Domain::Groups => self.groups.invalidate_all(),
            Domain::Quotes => self.quotes.invalidate_all(),
            Domain::Gallery => self.gallery.invalidate_all(),
            Domain::OrgChart => self.org_chart.invalidate_all(),
            Domain::Karya => self.karya.invalidate_all(),
        }
        debug!(%domain, "cache invalidated");
    }

    // -----------------------------------------------------------------------
    // queries
    // -----------------------------------------------------------------------

    pub async fn students(&self) -> Arc<Sourced<Vec<Student>>> {
        self.count_lookup(Domain::Students, self.students.is_cached(&()));
        let gateway = self.gateway.clone();
        self.students
            .get_or_fetch((), || async move {
                let request = SelectRequest::new("profiles")
                    .columns("id, nama, gender, no_absen, avatar_url")
                    .order_by("no_absen", Direction::Ascending);
                resolve(
                    Domain::Students,
                    gateway.select(request).await,
                    normalize::students,
                    normalize::students_fallback,
                )
            })
            .await
    }

    pub async fn schedules(&self, minggu: WeekParity) -> Arc<Sourced<Vec<ScheduleEntry>>> {
        self.count_lookup(Domain::Schedules, self.schedules.is_cached(&minggu));
        let gateway = self.gateway.clone();
        self.schedules
            .get_or_fetch(minggu, || async move {
                let request = SelectRequest::new("schedules")
                    .filter_eq("minggu", minggu.to_string())
                    .order_by("urutan", Direction::Ascending);
                resolve(
                    Domain::Schedules,
                    gateway.select(request).await,
                    normalize::schedules,
                    || normalize::schedules_fallback(minggu),
                )
            })
            .await
    }

    pub async fn tasks(&self) -> Arc<Sourced<Vec<Task>>> {
        self.count_lookup(Domain::Tasks, self.tasks.is_cached(&()));
        let gateway = self.gateway.clone();
        self.tasks
            .get_or_fetch((), || async move {
                let request =
                    SelectRequest::new("tasks").order_by("deadline", Direction::Ascending);
                resolve(
                    Domain::Tasks,
                    gateway.select(request).await,
                    normalize::tasks,
                    normalize::tasks_fallback,
                )
            })
            .await
    }

    pub async fn donations(&self) -> Arc<Sourced<Vec<Donation>>> {
        self.count_lookup(Domain::Infaq, self.donations.is_cached(&()));
        let gateway = self.gateway.clone();
        self.donations
            .get_or_fetch((), || async move {
                let request = SelectRequest::new("infaq_transactions")
                    .columns("id, siswa_id, nominal, tanggal, created_at, profiles:siswa_id(nama)")
                    .order_by("tanggal", Direction::Descending);
                resolve(
                    Domain::Infaq,
                    gateway.select(request).await,
                    normalize::donations,
                    normalize::donations_fallback,
                )
            })
            .await
    }

    /// Groups need two reads: the groups themselves and the membership join
    /// table. A failure of either, or zero groups, falls back as a whole.
    pub async fn groups(&self) -> Arc<Sourced<Vec<Group>>> {
        self.count_lookup(Domain::Groups, self.groups.is_cached(&()));
        let gateway = self.gateway.clone();
        self.groups
            .get_or_fetch((), || async move {
                let groups_read = gateway
                    .select(SelectRequest::new("groups").order_by("id", Direction::Ascending))
                    .await;
                let members_read = gateway
                    .select(SelectRequest::new("group_members").columns(
                        "id, group_id, profile_id, profiles:profile_id(nama)",
                    ))
                    .await;
                let joined = match (groups_read, members_read) {
                    (Ok(group_rows), Ok(member_rows)) => Ok((group_rows, member_rows)),
                    (Err(err), _) | (_, Err(err)) => Err(err),
                };
                resolve(
                    Domain::Groups,
                    joined,
                    |(group_rows, member_rows)| normalize::groups(group_rows, member_rows),
                    normalize::groups_fallback,
                )
            })
            .await
    }

    pub async fn quotes(&self) -> Arc<Sourced<Vec<Quote>>> {
        self.count_lookup(Domain::Quotes, self.quotes.is_cached(&()));
        let gateway = self.gateway.clone();
        self.quotes
            .get_or_fetch((), || async move {
                let request = SelectRequest::new("quotes").order_by("id", Direction::Ascending);
                resolve(
                    Domain::Quotes,
                    gateway.select(request).await,
                    normalize::quotes,
                    normalize::quotes_fallback,
                )
            })
            .await
    }

    pub async fn gallery(&self) -> Arc<Sourced<Vec<GalleryItem>>> {
        self.count_lookup(Domain::Gallery, self.gallery.is_cached(&()));
        let gateway = self.gateway.clone();
        self.gallery
            .get_or_fetch((), || async move {
                let request =
                    SelectRequest::new("gallery").order_by("created_at", Direction::Descending);
                resolve(
                    Domain::Gallery,
                    gateway.select(request).await,
                    normalize::gallery,
                    normalize::gallery_fallback,
                )
            })
            .await
    }

    /// Student works. No mock counterpart: read failures surface after a
    /// couple of retries and an empty list is served as-is.
    pub async fn karya(&self) -> Result<Arc<Vec<Karya>>, PortalError> {
        self.count_lookup(Domain::Karya, self.karya.is_cached(&()));
        let gateway = self.gateway.clone();
        self.karya
            .get_or_try_fetch((), || async move {
                let request =
                    SelectRequest::new("karya").order_by("created_at", Direction::Descending);
                let rows = select_with_retry(gateway.as_ref(), request).await?;
                Ok(normalize::karya(rows))
            })
            .await
    }

    pub async fn org_chart(&self) -> Arc<Sourced<Vec<OrgChartEntry>>> {
        self.count_lookup(Domain::OrgChart, self.org_chart.is_cached(&()));
        let gateway = self.gateway.clone();
        self.org_chart
            .get_or_fetch((), || async move {
                let request = SelectRequest::new("class_structure")
                    .order_by("urutan", Direction::Ascending);
                resolve(
                    Domain::OrgChart,
                    gateway.select(request).await,
                    normalize::org_chart,
                    normalize::org_chart_fallback,
                )
            })
            .await
    }

    // -----------------------------------------------------------------------
    // mutations
    // -----------------------------------------------------------------------
    //
    // Writes go straight to the gateway and are never mirrored into the mock
    // dataset. Errors surface to the caller; on success only the affected
    // domain's cache is invalidated.

    pub async fn add_task(&self, task: NewTask) -> Result<(), PortalError> {
        if task.judul.trim().is_empty() {
            return Err(PortalError::MissingField("judul"));
        }
        if task.deadline.trim().is_empty() {
            return Err(PortalError::MissingField("deadline"));
        }
        self.gateway
            .insert(
                "tasks",
                serde_json::json!({
                    "judul": task.judul,
                    "deskripsi": task.deskripsi,
                    "mata_pelajaran": task.mata_pelajaran,
                    "deadline": task.deadline,
                    "selesai": false,
                }),
            )
            .await?;
        self.invalidate(Domain::Tasks);
        Ok(())
    }

    pub async fn set_task_done(&self, id: &str, selesai: bool) -> Result<(), PortalError> {
        self.gateway
            .update("tasks", id, serde_json::json!({ "selesai": selesai }))
            .await?;
        self.invalidate(Domain::Tasks);
        Ok(())
    }

    pub async fn delete_task(&self, id: &str) -> Result<(), PortalError> {
        self.gateway.delete("tasks", id).await?;
        self.invalidate(Domain::Tasks);
        Ok(())
    }

    pub async fn add_donation(&self, donation: NewDonation) -> Result<(), PortalError> {
        if donation.siswa_id.trim().is_empty() {
            return Err(PortalError::MissingField("siswa_id"));
        }
        if donation.nominal <= 0 {
            return Err(PortalError::MissingField("nominal"));
        }
        if donation.tanggal.trim().is_empty() {
            return Err(PortalError::MissingField("tanggal"));
        }
        self.gateway
            .insert(
                "infaq_transactions",
                serde_json::json!({
                    "siswa_id": donation.siswa_id,
                    "nominal": donation.nominal,
                    "tanggal": donation.tanggal,
                }),
            )
            .await?;
        self.invalidate(Domain::Infaq);
        Ok(())
    }

    pub async fn delete_donation(&self, id: &str) -> Result<(), PortalError> {
        self.gateway.delete("infaq_transactions", id).await?;
        self.invalidate(Domain::Infaq);
        Ok(())
    }

    /// Submit a work under the signed-in user's identity.
    pub async fn add_karya(&self, karya: NewKarya, session: &Session) -> Result<(), PortalError> {
        if karya.judul.trim().is_empty() {
            return Err(PortalError::MissingField("judul"));
        }
        let user_email = if session.email.is_empty() {
            "unknown"
        } else {
            session.email.as_str()
        };
        self.gateway
            .insert(
                "karya",
                serde_json::json!({
                    "user_id": session.user_id,
                    "user_email": user_email,
                    "judul": karya.judul.trim(),
                    "deskripsi": karya.deskripsi.trim(),
                    "kategori": karya.kategori,
                    "link_url": none_if_blank(&karya.link_url),
                    "image_url": none_if_blank(&karya.image_url),
                }),
            )
            .await?;
        self.invalidate(Domain::Karya);
        Ok(())
    }

    pub async fn delete_karya(&self, id: &str) -> Result<(), PortalError> {
        self.gateway.delete("karya", id).await?;
        self.invalidate(Domain::Karya);
        Ok(())
    }
}

/// Blank optional URL fields are stored as nulls, not empty strings.
fn none_if_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

/// Retry budget for reads without a mock fallback.
const READ_RETRIES: u32 = 2;

async fn select_with_retry(
    gateway: &dyn DataGateway,
    request: SelectRequest,
) -> Result<Vec<Value>, GatewayError> {
    let mut attempt = 0;
    loop {
        match gateway.select(request.clone()).await {
            Ok(rows) => return Ok(rows),
            Err(err) if attempt < READ_RETRIES && err.is_retryable() => {
                attempt += 1;
                warn!(
                    collection = request.collection,
                    category = err.category(),
                    attempt,
                    "read failed, retrying"
                );
            }
            Err(err) => return Err(err),
        }
    }
}

/// The fallback policy in one place: a failed or empty read serves the
/// normalized mock dataset, a non-empty read serves the normalized rows.
fn resolve<R, T>(
    domain: Domain,
    read: Result<R, GatewayError>,
    live: impl FnOnce(R) -> Vec<T>,
    fallback: impl FnOnce() -> Vec<T>,
) -> Sourced<Vec<T>>
where
    R: RowCount,
{
    match read {
        Ok(rows) if !rows.is_empty() => Sourced::live(live(rows)),
        Ok(_) => {
            debug!(%domain, "backend returned no rows, serving mock data");
            Sourced::fallback(fallback())
        }
        Err(err) => {
            warn!(%domain, category = err.category(), %err, "read failed, serving mock data");
            Sourced::fallback(fallback())
        }
    }
}

/// Emptiness check for `resolve` inputs; the groups query carries a tuple of
/// row sets and falls back when the primary set is empty.
trait RowCount {
    fn is_empty(&self) -> bool;
}

impl RowCount for Vec<Value> {
    fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

impl RowCount for (Vec<Value>, Vec<Value>) {
    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

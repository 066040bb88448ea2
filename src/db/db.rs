use crate::db::schema::{self, SchemaInfo};
use crate::libs::error::{EngineError, EngineResult};
use parking_lot::Mutex;
use rusqlite::{Connection, OpenFlags, TransactionBehavior};
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);
const MAX_IDLE_CONNECTIONS: usize = 4;
/// Virtual machine steps between two cancellation checks.
const PROGRESS_STEPS: i32 = 1_000;

/// Cooperative cancellation flag shared between a caller and its queries.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_canceled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Per-query limits.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    pub timeout: Option<Duration>,
    pub cancel: Option<CancelToken>,
}

impl QueryOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// Limits of one running query, checked from the progress handler and between
/// load phases.
#[derive(Debug, Clone)]
struct Limits {
    deadline: Option<Instant>,
    cancel: Option<CancelToken>,
}

impl Limits {
    fn new(options: &QueryOptions) -> Self {
        Limits {
            deadline: options.timeout.map(|timeout| Instant::now() + timeout),
            cancel: options.cancel.clone(),
        }
    }

    fn is_active(&self) -> bool {
        self.deadline.is_some() || self.cancel.is_some()
    }

    fn exceeded(&self) -> Option<&'static str> {
        if self.cancel.as_ref().is_some_and(CancelToken::is_canceled) {
            return Some("canceled by caller");
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Some("query timeout elapsed");
        }
        None
    }

    fn check(&self) -> EngineResult<()> {
        match self.exceeded() {
            Some(reason) => Err(EngineError::Canceled(reason.to_string())),
            None => Ok(()),
        }
    }
}

/// One consistent read of the store.
///
/// Every row loaded through a snapshot comes from the same read transaction.
pub struct Snapshot<'c> {
    conn: &'c Connection,
    schema: SchemaInfo,
    limits: &'c Limits,
}

impl<'c> Snapshot<'c> {
    pub fn conn(&self) -> &Connection {
        self.conn
    }

    pub fn schema(&self) -> SchemaInfo {
        self.schema
    }

    /// Fails with `Canceled` once the caller gave up or the deadline passed.
    pub fn checkpoint(&self) -> EngineResult<()> {
        self.limits.check()
    }
}

#[derive(Debug)]
struct StoreInner {
    path: PathBuf,
    schema: SchemaInfo,
    idle: Mutex<Vec<Connection>>,
}

/// Read-only handle to a Things database.
///
/// Cheap to clone and safe to share across threads; each query checks out
/// its own connection.
#[derive(Debug, Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl Store {
    /// Opens the database and verifies the tables the engine reads.
    pub fn open(path: impl AsRef<Path>) -> EngineResult<Self> {
        let started = Instant::now();
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(EngineError::StoreUnavailable(format!("no database at {}", path.display())));
        }

        let conn = open_connection(&path)?;
        let schema = schema::verify_schema(&conn)?;
        debug!(
            path = %path.display(),
            area_trashed = schema.area_trashed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "store opened"
        );

        Ok(Store {
            inner: Arc::new(StoreInner {
                path,
                schema,
                idle: Mutex::new(vec![conn]),
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    pub fn schema(&self) -> SchemaInfo {
        self.inner.schema
    }

    /// Runs `read` inside one deferred read transaction.
    pub fn read<T>(&self, operation: &'static str, options: &QueryOptions, read: impl FnOnce(&Snapshot<'_>) -> EngineResult<T>) -> EngineResult<T> {
        let started = Instant::now();
        let limits = Limits::new(options);
        limits.check()?;

        let mut conn = self.checkout()?;
        if limits.is_active() {
            let watch = limits.clone();
            let _ = conn.progress_handler(PROGRESS_STEPS, Some(move || watch.exceeded().is_some()));
        }

        let result = (|| -> EngineResult<T> {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Deferred)?;
            let snapshot = Snapshot {
                conn: &tx,
                schema: self.inner.schema,
                limits: &limits,
            };
            let value = read(&snapshot)?;
            snapshot.checkpoint()?;
            Ok(value)
        })();

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match result {
            Err(EngineError::Canceled(_)) => {
                let reason = limits.exceeded().unwrap_or("store call interrupted");
                warn!(operation, elapsed_ms, reason, "query canceled");
                Err(EngineError::Canceled(reason.to_string()))
            }
            Err(err) => {
                debug!(operation, elapsed_ms, error = %err, "query failed");
                Err(err)
            }
            Ok(value) => {
                debug!(operation, elapsed_ms, "query finished");
                Ok(value)
            }
        }
    }

    fn checkout(&self) -> EngineResult<PooledConnection<'_>> {
        let pooled = self.inner.idle.lock().pop();
        let conn = match pooled {
            Some(conn) => conn,
            None => open_connection(&self.inner.path)?,
        };
        Ok(PooledConnection {
            pool: &self.inner.idle,
            conn: Some(conn),
        })
    }
}

fn open_connection(path: &Path) -> EngineResult<Connection> {
    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX)
        .map_err(|e| EngineError::StoreUnavailable(format!("cannot open {}: {}", path.display(), e)))?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(conn)
}

/// A connection on loan from the pool; returned on drop, including unwinds.
struct PooledConnection<'s> {
    pool: &'s Mutex<Vec<Connection>>,
    conn: Option<Connection>,
}

impl Deref for PooledConnection<'_> {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        self.conn.as_ref().unwrap_or_else(|| unreachable!("connection is present until drop"))
    }
}

impl DerefMut for PooledConnection<'_> {
    fn deref_mut(&mut self) -> &mut Connection {
        self.conn.as_mut().unwrap_or_else(|| unreachable!("connection is present until drop"))
    }
}

impl Drop for PooledConnection<'_> {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            let _ = conn.progress_handler(0, None::<fn() -> bool>);
            let mut idle = self.pool.lock();
            if idle.len() < MAX_IDLE_CONNECTIONS {
                idle.push(conn);
            }
        }
    }
}

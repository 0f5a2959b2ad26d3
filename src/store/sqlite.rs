//! SQLite-backed record store.

use super::{
    validate_choice, Channel, ChannelStats, ChannelUpdate, Idea, NewChannel, NewIdea, NewVideo,
    NewWorkflowLog, Page, Video, WorkflowLog, WorkflowStatus, IDEA_STATUSES, LOG_STATUSES,
};
use crate::error::{Result, ShortsmithError};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, instrument};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS channels (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        category TEXT NOT NULL,
        topic TEXT NOT NULL,
        description TEXT,
        target_audience TEXT,
        content_style TEXT,
        keywords TEXT NOT NULL DEFAULT '[]',
        video_duration INTEGER NOT NULL DEFAULT 60,
        privacy_status TEXT NOT NULL DEFAULT 'private',
        total_videos INTEGER NOT NULL DEFAULT 0,
        total_views INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS ideas (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        channel_id INTEGER NOT NULL REFERENCES channels(id) ON DELETE CASCADE,
        title TEXT NOT NULL,
        hook TEXT,
        content TEXT,
        cta TEXT,
        keywords TEXT NOT NULL DEFAULT '[]',
        script TEXT,
        status TEXT NOT NULL DEFAULT 'pending',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_ideas_channel_id ON ideas(channel_id);

    CREATE TABLE IF NOT EXISTS videos (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        channel_id INTEGER NOT NULL REFERENCES channels(id) ON DELETE CASCADE,
        idea_id INTEGER REFERENCES ideas(id) ON DELETE SET NULL,
        title TEXT NOT NULL,
        description TEXT,
        audio_path TEXT,
        thumbnail_path TEXT,
        video_path TEXT,
        youtube_video_id TEXT,
        duration INTEGER,
        file_size INTEGER,
        status TEXT NOT NULL DEFAULT 'pending',
        error_message TEXT,
        views INTEGER NOT NULL DEFAULT 0,
        likes INTEGER NOT NULL DEFAULT 0,
        comments INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_videos_channel_id ON videos(channel_id);

    CREATE TABLE IF NOT EXISTS workflow_logs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        channel_id INTEGER NOT NULL REFERENCES channels(id) ON DELETE CASCADE,
        video_id INTEGER REFERENCES videos(id) ON DELETE SET NULL,
        step TEXT NOT NULL,
        status TEXT NOT NULL,
        message TEXT,
        error TEXT,
        execution_ms INTEGER,
        created_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_workflow_logs_channel_id ON workflow_logs(channel_id);
"#;

const CHANNEL_COLUMNS: &str = "id, name, category, topic, description, target_audience, \
    content_style, keywords, video_duration, privacy_status, total_videos, total_views, \
    created_at, updated_at";

const IDEA_COLUMNS: &str =
    "id, channel_id, title, hook, content, cta, keywords, script, status, created_at, updated_at";

const VIDEO_COLUMNS: &str = "id, channel_id, idea_id, title, description, audio_path, \
    thumbnail_path, video_path, youtube_video_id, duration, file_size, status, error_message, \
    views, likes, comments, created_at, updated_at";

const LOG_COLUMNS: &str =
    "id, channel_id, video_id, step, status, message, error, execution_ms, created_at";

/// Channels, ideas, videos and workflow logs in one SQLite database.
pub struct RecordStore {
    conn: Mutex<Connection>,
}

impl RecordStore {
    /// Open (or create) the database at `path`.
    #[instrument(skip_all)]
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        let store = Self::init(conn)?;

        info!("Opened record store at {:?}", path);
        Ok(store)
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| ShortsmithError::Store(format!("Failed to acquire lock: {}", e)))
    }

    // ---- channels ----

    #[instrument(skip(self, channel), fields(name = %channel.name))]
    pub fn create_channel(&self, channel: NewChannel) -> Result<Channel> {
        channel.validate()?;
        let conn = self.lock()?;
        let now = now();

        conn.execute(
            r#"
            INSERT INTO channels
            (name, category, topic, description, target_audience, content_style, keywords,
             video_duration, privacy_status, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
            "#,
            params![
                channel.name,
                channel.category,
                channel.topic,
                channel.description,
                channel.target_audience,
                channel.content_style,
                keywords_to_json(&channel.keywords)?,
                channel.video_duration,
                channel.privacy_status,
                now,
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!("Created channel {}", id);
        fetch_channel(&conn, id)
    }

    pub fn list_channels(&self, page: Page) -> Result<Vec<Channel>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {CHANNEL_COLUMNS} FROM channels ORDER BY id LIMIT ?1 OFFSET ?2"
        ))?;
        let rows = stmt.query_map(params![page.limit as i64, page.skip as i64], channel_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn get_channel(&self, id: i64) -> Result<Channel> {
        let conn = self.lock()?;
        fetch_channel(&conn, id)
    }

    #[instrument(skip(self, update))]
    pub fn update_channel(&self, id: i64, update: ChannelUpdate) -> Result<Channel> {
        update.validate()?;
        let conn = self.lock()?;
        let mut channel = fetch_channel(&conn, id)?;
        update.apply(&mut channel);

        conn.execute(
            r#"
            UPDATE channels SET
                name = ?2, category = ?3, topic = ?4, description = ?5, target_audience = ?6,
                content_style = ?7, keywords = ?8, video_duration = ?9, privacy_status = ?10,
                updated_at = ?11
            WHERE id = ?1
            "#,
            params![
                id,
                channel.name,
                channel.category,
                channel.topic,
                channel.description,
                channel.target_audience,
                channel.content_style,
                keywords_to_json(&channel.keywords)?,
                channel.video_duration,
                channel.privacy_status,
                now(),
            ],
        )?;

        fetch_channel(&conn, id)
    }

    /// Delete a channel together with its ideas, videos and logs.
    #[instrument(skip(self))]
    pub fn delete_channel(&self, id: i64) -> Result<()> {
        let conn = self.lock()?;
        let deleted = conn.execute("DELETE FROM channels WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(channel_not_found(id));
        }
        info!("Deleted channel {}", id);
        Ok(())
    }

    pub fn channel_stats(&self, id: i64) -> Result<ChannelStats> {
        let conn = self.lock()?;
        let channel = fetch_channel(&conn, id)?;

        let (count, views, likes): (i64, i64, i64) = conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(views), 0), COALESCE(SUM(likes), 0) FROM videos WHERE channel_id = ?1",
            params![id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;

        let avg_views_per_video = if count > 0 {
            views as f64 / count as f64
        } else {
            0.0
        };

        let recent_videos = query_videos(&conn, Some(id), None, Page::new(None, Some(10), 10))?;

        Ok(ChannelStats {
            total_videos: channel.total_videos,
            total_views: views,
            total_likes: likes,
            avg_views_per_video,
            recent_videos,
        })
    }

    /// Bump the channel's produced-video counter.
    pub fn increment_total_videos(&self, id: i64) -> Result<()> {
        let conn = self.lock()?;
        let updated = conn.execute(
            "UPDATE channels SET total_videos = total_videos + 1, updated_at = ?2 WHERE id = ?1",
            params![id, now()],
        )?;
        if updated == 0 {
            return Err(channel_not_found(id));
        }
        Ok(())
    }

    // ---- ideas ----

    pub fn create_idea(&self, idea: NewIdea) -> Result<Idea> {
        if idea.title.trim().is_empty() {
            return Err(ShortsmithError::InvalidInput("title must not be empty".into()));
        }
        let conn = self.lock()?;
        fetch_channel(&conn, idea.channel_id)?;
        let now = now();

        conn.execute(
            r#"
            INSERT INTO ideas (channel_id, title, hook, content, cta, keywords, status, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'pending', ?7, ?7)
            "#,
            params![
                idea.channel_id,
                idea.title,
                idea.hook,
                idea.content,
                idea.cta,
                keywords_to_json(&idea.keywords)?,
                now,
            ],
        )?;

        fetch_idea(&conn, conn.last_insert_rowid())
    }

    pub fn list_ideas(
        &self,
        channel_id: Option<i64>,
        status: Option<&str>,
        page: Page,
    ) -> Result<Vec<Idea>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {IDEA_COLUMNS} FROM ideas
            WHERE (?1 IS NULL OR channel_id = ?1) AND (?2 IS NULL OR status = ?2)
            ORDER BY id LIMIT ?3 OFFSET ?4
            "#
        ))?;
        let rows = stmt.query_map(
            params![channel_id, status, page.limit as i64, page.skip as i64],
            idea_from_row,
        )?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn get_idea(&self, id: i64) -> Result<Idea> {
        let conn = self.lock()?;
        fetch_idea(&conn, id)
    }

    pub fn set_idea_status(&self, id: i64, status: &str) -> Result<Idea> {
        validate_choice("status", status, &IDEA_STATUSES)?;
        let conn = self.lock()?;
        let updated = conn.execute(
            "UPDATE ideas SET status = ?2, updated_at = ?3 WHERE id = ?1",
            params![id, status, now()],
        )?;
        if updated == 0 {
            return Err(ShortsmithError::NotFound(format!("Idea {} not found", id)));
        }
        fetch_idea(&conn, id)
    }

    pub fn delete_idea(&self, id: i64) -> Result<()> {
        let conn = self.lock()?;
        let deleted = conn.execute("DELETE FROM ideas WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(ShortsmithError::NotFound(format!("Idea {} not found", id)));
        }
        Ok(())
    }

    // ---- videos ----

    #[instrument(skip(self, video), fields(channel_id = video.channel_id))]
    pub fn create_video(&self, video: NewVideo) -> Result<Video> {
        video.validate()?;
        let conn = self.lock()?;
        fetch_channel(&conn, video.channel_id)?;
        let now = now();

        conn.execute(
            r#"
            INSERT INTO videos
            (channel_id, idea_id, title, description, audio_path, thumbnail_path, video_path,
             file_size, status, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
            "#,
            params![
                video.channel_id,
                video.idea_id,
                video.title,
                video.description,
                video.audio_path,
                video.thumbnail_path,
                video.video_path,
                video.file_size,
                video.status,
                now,
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!("Created video {}", id);
        fetch_video(&conn, id)
    }

    /// Videos newest first.
    pub fn list_videos(
        &self,
        channel_id: Option<i64>,
        status: Option<&str>,
        page: Page,
    ) -> Result<Vec<Video>> {
        let conn = self.lock()?;
        query_videos(&conn, channel_id, status, page)
    }

    pub fn get_video(&self, id: i64) -> Result<Video> {
        let conn = self.lock()?;
        fetch_video(&conn, id)
    }

    pub fn delete_video(&self, id: i64) -> Result<()> {
        let conn = self.lock()?;
        let deleted = conn.execute("DELETE FROM videos WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(ShortsmithError::NotFound(format!("Video {} not found", id)));
        }
        Ok(())
    }

    // ---- workflow ----

    pub fn append_log(&self, log: NewWorkflowLog) -> Result<WorkflowLog> {
        validate_choice("status", &log.status, &LOG_STATUSES)?;
        let conn = self.lock()?;

        conn.execute(
            r#"
            INSERT INTO workflow_logs
            (channel_id, video_id, step, status, message, error, execution_ms, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                log.channel_id,
                log.video_id,
                log.step,
                log.status,
                log.message,
                log.error,
                log.execution_ms,
                now(),
            ],
        )?;

        let id = conn.last_insert_rowid();
        Ok(conn.query_row(
            &format!("SELECT {LOG_COLUMNS} FROM workflow_logs WHERE id = ?1"),
            params![id],
            log_from_row,
        )?)
    }

    /// Logs for a channel, newest first.
    pub fn list_logs(&self, channel_id: i64, page: Page) -> Result<Vec<WorkflowLog>> {
        let conn = self.lock()?;
        fetch_channel(&conn, channel_id)?;
        query_logs(&conn, channel_id, page)
    }

    /// Running while the newest log is a `started` event, idle otherwise.
    pub fn workflow_status(&self, channel_id: i64) -> Result<WorkflowStatus> {
        let conn = self.lock()?;
        fetch_channel(&conn, channel_id)?;

        let recent_logs = query_logs(&conn, channel_id, Page::new(None, Some(10), 10))?;
        let in_progress_videos: i64 = conn.query_row(
            "SELECT COUNT(*) FROM videos WHERE channel_id = ?1 AND status IN ('pending', 'rendering')",
            params![channel_id],
            |row| row.get(0),
        )?;

        let running = recent_logs.first().filter(|log| log.status == "started");
        Ok(WorkflowStatus {
            channel_id,
            status: if running.is_some() { "running" } else { "idle" }.to_string(),
            current_step: running.map(|log| log.step.clone()),
            progress: if running.is_some() { 50 } else { 0 },
            in_progress_videos,
            recent_logs,
        })
    }
}

fn now() -> String {
    Utc::now().to_rfc3339()
}

fn parse_time(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn keywords_to_json(keywords: &[String]) -> Result<String> {
    Ok(serde_json::to_string(keywords)?)
}

fn keywords_from_json(json: &str) -> Vec<String> {
    serde_json::from_str(json).unwrap_or_default()
}

fn channel_not_found(id: i64) -> ShortsmithError {
    ShortsmithError::NotFound(format!("Channel {} not found", id))
}

fn channel_from_row(row: &Row<'_>) -> rusqlite::Result<Channel> {
    let keywords: String = row.get(7)?;
    let created_at: String = row.get(12)?;
    let updated_at: String = row.get(13)?;
    Ok(Channel {
        id: row.get(0)?,
        name: row.get(1)?,
        category: row.get(2)?,
        topic: row.get(3)?,
        description: row.get(4)?,
        target_audience: row.get(5)?,
        content_style: row.get(6)?,
        keywords: keywords_from_json(&keywords),
        video_duration: row.get(8)?,
        privacy_status: row.get(9)?,
        total_videos: row.get(10)?,
        total_views: row.get(11)?,
        created_at: parse_time(&created_at),
        updated_at: parse_time(&updated_at),
    })
}

fn idea_from_row(row: &Row<'_>) -> rusqlite::Result<Idea> {
    let keywords: String = row.get(6)?;
    let created_at: String = row.get(9)?;
    let updated_at: String = row.get(10)?;
    Ok(Idea {
        id: row.get(0)?,
        channel_id: row.get(1)?,
        title: row.get(2)?,
        hook: row.get(3)?,
        content: row.get(4)?,
        cta: row.get(5)?,
        keywords: keywords_from_json(&keywords),
        script: row.get(7)?,
        status: row.get(8)?,
        created_at: parse_time(&created_at),
        updated_at: parse_time(&updated_at),
    })
}

fn video_from_row(row: &Row<'_>) -> rusqlite::Result<Video> {
    let created_at: String = row.get(16)?;
    let updated_at: String = row.get(17)?;
    Ok(Video {
        id: row.get(0)?,
        channel_id: row.get(1)?,
        idea_id: row.get(2)?,
        title: row.get(3)?,
        description: row.get(4)?,
        audio_path: row.get(5)?,
        thumbnail_path: row.get(6)?,
        video_path: row.get(7)?,
        youtube_video_id: row.get(8)?,
        duration: row.get(9)?,
        file_size: row.get(10)?,
        status: row.get(11)?,
        error_message: row.get(12)?,
        views: row.get(13)?,
        likes: row.get(14)?,
        comments: row.get(15)?,
        created_at: parse_time(&created_at),
        updated_at: parse_time(&updated_at),
    })
}

fn log_from_row(row: &Row<'_>) -> rusqlite::Result<WorkflowLog> {
    let created_at: String = row.get(8)?;
    Ok(WorkflowLog {
        id: row.get(0)?,
        channel_id: row.get(1)?,
        video_id: row.get(2)?,
        step: row.get(3)?,
        status: row.get(4)?,
        message: row.get(5)?,
        error: row.get(6)?,
        execution_ms: row.get(7)?,
        created_at: parse_time(&created_at),
    })
}

fn fetch_channel(conn: &Connection, id: i64) -> Result<Channel> {
    conn.query_row(
        &format!("SELECT {CHANNEL_COLUMNS} FROM channels WHERE id = ?1"),
        params![id],
        channel_from_row,
    )
    .optional()?
    .ok_or_else(|| channel_not_found(id))
}

fn fetch_idea(conn: &Connection, id: i64) -> Result<Idea> {
    conn.query_row(
        &format!("SELECT {IDEA_COLUMNS} FROM ideas WHERE id = ?1"),
        params![id],
        idea_from_row,
    )
    .optional()?
    .ok_or_else(|| ShortsmithError::NotFound(format!("Idea {} not found", id)))
}

fn fetch_video(conn: &Connection, id: i64) -> Result<Video> {
    conn.query_row(
        &format!("SELECT {VIDEO_COLUMNS} FROM videos WHERE id = ?1"),
        params![id],
        video_from_row,
    )
    .optional()?
    .ok_or_else(|| ShortsmithError::NotFound(format!("Video {} not found", id)))
}

fn query_videos(
    conn: &Connection,
    channel_id: Option<i64>,
    status: Option<&str>,
    page: Page,
) -> Result<Vec<Video>> {
    let mut stmt = conn.prepare(&format!(
        r#"
        SELECT {VIDEO_COLUMNS} FROM videos
        WHERE (?1 IS NULL OR channel_id = ?1) AND (?2 IS NULL OR status = ?2)
        ORDER BY id DESC LIMIT ?3 OFFSET ?4
        "#
    ))?;
    let rows = stmt.query_map(
        params![channel_id, status, page.limit as i64, page.skip as i64],
        video_from_row,
    )?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

fn query_logs(conn: &Connection, channel_id: i64, page: Page) -> Result<Vec<WorkflowLog>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {LOG_COLUMNS} FROM workflow_logs WHERE channel_id = ?1 ORDER BY id DESC LIMIT ?2 OFFSET ?3"
    ))?;
    let rows = stmt.query_map(
        params![channel_id, page.limit as i64, page.skip as i64],
        log_from_row,
    )?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

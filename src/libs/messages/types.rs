#[derive(Debug, Clone)]
pub enum Message {
    // === LIST MESSAGES ===
    ListHeader(String, usize), // list name, count
    LogbookHeader(usize),
    DeadlinesHeader(i64, usize), // days, count
    SearchResultsHeader(String, usize),
    NoTasksFound,
    NoTasksInList(String),

    // === TASK MESSAGES ===
    TaskDetailsHeader(String),
    TaskNotes,
    TaskTags(String),

    // === AREA MESSAGES ===
    AreasHeader(usize),
    AreaHeader(String),
    AreaProjectsHeader(usize),
    AreaTasksHeader(usize),
    NoAreasFound,

    // === PROJECT MESSAGES ===
    ProjectsHeader(usize),
    ProjectHeader(String),
    ProjectHeadingsHeader(usize),
    ProjectTasksHeader(usize),
    NoProjectsFound,

    // === TAG MESSAGES ===
    TagsHeader(usize),
    TagTasksHeader(String, usize),
    NoTagsFound,

    // === SNAPSHOT MESSAGES ===
    SnapshotAreaHeader(String, usize, usize), // title, open tasks, active projects
    SnapshotUnfiledHeader,

    // === DATABASE MESSAGES ===
    DbOpened(String),
    DbAreasWithoutTrash,
    DbAutodetected(String),
    DbNotFound,
    DbPathInvalid(String),
    DbOpenFailed(String),

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigLoaded,
    ConfigParseError,
    ConfigSaveError,
    ConfigModuleDatabase,
    ConfigModuleQueries,
    ConfigCurrent(String),

    // === PROMPTS ===
    PromptDbPath,
    PromptUseDetectedDb(String),
    PromptLogbookLimit,
    PromptDeadlineDays,
    PromptQueryTimeout,

    // === ERRORS ===
    QueryFailed(String),
    JsonEncodeFailed(String),
    Interrupted,
}

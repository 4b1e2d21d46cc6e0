use std::fmt;

/// Named collections held by the record store.
///
/// Each value is one JSON document replaced wholesale on write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Categories,
    Sectors,
    Requests,
    AuditLog,
    ProtocolCounter,
    SystemLogs,
    Session,
}

impl Collection {
    pub const ALL: [Self; 8] = [
        Self::Users,
        Self::Categories,
        Self::Sectors,
        Self::Requests,
        Self::AuditLog,
        Self::ProtocolCounter,
        Self::SystemLogs,
        Self::Session,
    ];

    /// Storage key for this collection.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Categories => "categories",
            Self::Sectors => "sectors",
            Self::Requests => "requests",
            Self::AuditLog => "audit-log",
            Self::ProtocolCounter => "protocol-counter",
            Self::SystemLogs => "system-logs",
            Self::Session => "session",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

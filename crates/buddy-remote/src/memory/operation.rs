//! Remote operations, used for call logs and failure injection

/// One method of the remote service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteOperation {
    Init,
    CreateUser,
    Login,
    Logout,
    LoggedInUser,
    ListUsers,
    SendMessage,
    FetchMessages,
}

impl std::fmt::Display for RemoteOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::CreateUser => "createUser",
            Self::Login => "login",
            Self::Logout => "logout",
            Self::LoggedInUser => "getLoggedInUser",
            Self::ListUsers => "listUsers",
            Self::SendMessage => "sendMessage",
            Self::FetchMessages => "fetchMessages",
        };
        f.write_str(name)
    }
}

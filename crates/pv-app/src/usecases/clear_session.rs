use crate::session::PhotoSession;

pub struct ClearSession {
    session: PhotoSession,
}

impl ClearSession {
    pub fn new(session: PhotoSession) -> Self {
        Self { session }
    }

    #[tracing::instrument(name = "usecase.clear_session.execute", skip(self))]
    pub fn execute(&self) {
        self.session.clear();
    }
}

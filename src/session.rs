//! The load → merge → build pipeline behind the viewer.
//!
//! A [`Session`] collects captured rooms, hands them to a [`StructureMerger`]
//! and turns the merged structure into a [`RoomScene`]. The merge runs as one
//! spawned task that can be aborted through its [`SessionHandle`], and whatever
//! shows the scene only receives it through [`present`] once every step has
//! succeeded.

use std::path::Path;

use futures::future::{AbortHandle, Abortable, Aborted};
use thiserror::Error;

use crate::{
    data_structures::{capture::CapturedRoom, scene_graph::RoomScene},
    merge::{MergeError, StructureMerger},
    resources::{LoadError, load_captured_room},
};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("merging the captured rooms failed: {0}")]
    Merge(#[from] MergeError),

    #[error("the session was cancelled before the structure was merged")]
    Cancelled,
}

/// Anything that can show a finished scene.
pub trait SceneTarget {
    fn assign_scene(&mut self, scene: RoomScene);
}

pub struct Session<M> {
    rooms: Vec<CapturedRoom>,
    merger: M,
}

impl<M: StructureMerger> Session<M> {
    pub fn new(merger: M) -> Self {
        Self {
            rooms: Vec::new(),
            merger,
        }
    }

    /// Load a capture and append it to the rooms of this session.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<&CapturedRoom, LoadError> {
        let room = load_captured_room(path.as_ref())?;
        self.rooms.push(room);
        Ok(&self.rooms[self.rooms.len() - 1])
    }

    pub fn rooms(&self) -> &[CapturedRoom] {
        &self.rooms
    }

    /// Merge all rooms and build the scene from the result.
    pub async fn build(&self) -> Result<RoomScene, SessionError> {
        let structure = self.merger.captured_structure(&self.rooms).await?;
        Ok(RoomScene::from_structure(structure))
    }
}

impl<M> Session<M>
where
    M: StructureMerger + Send + Sync + 'static,
{
    /// Run [`build`](Self::build) on `runtime`. The returned handle cancels or awaits it.
    pub fn spawn(self, runtime: &tokio::runtime::Handle) -> SessionHandle {
        let (abort, registration) = AbortHandle::new_pair();
        let task = runtime.spawn(async move {
            match Abortable::new(self.build(), registration).await {
                Ok(outcome) => outcome,
                Err(Aborted) => Err(SessionError::Cancelled),
            }
        });
        SessionHandle { abort, task }
    }
}

pub struct SessionHandle {
    abort: AbortHandle,
    task: tokio::task::JoinHandle<Result<RoomScene, SessionError>>,
}

impl SessionHandle {
    /// Abort an in-flight merge. Awaiting the handle afterwards yields
    /// [`SessionError::Cancelled`] unless the merge had already finished.
    pub fn cancel(&self) {
        self.abort.abort();
    }

    /// A second handle that cancels the same session.
    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    pub async fn join(self) -> Result<RoomScene, SessionError> {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(e) if e.is_cancelled() => Err(SessionError::Cancelled),
            Err(e) => std::panic::resume_unwind(e.into_panic()),
        }
    }
}

/// Hand a successful outcome to `target`. Failures are logged and returned; the
/// target is left untouched so it never shows a partial scene.
pub fn present<T: SceneTarget>(
    target: &mut T,
    outcome: Result<RoomScene, SessionError>,
) -> Result<usize, SessionError> {
    match outcome {
        Ok(scene) => {
            let nodes = scene.len();
            target.assign_scene(scene);
            Ok(nodes)
        }
        Err(e) => {
            log::error!("no scene to show: {e}");
            Err(e)
        }
    }
}

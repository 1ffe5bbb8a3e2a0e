use crate::db::Expense;
use crate::error::GastosError;
use crate::service::aggregation::MonthlySummary;
use crate::service::expense_repository::ExpenseRepository;
use crate::types::api::ExpenseInput;

use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use tokio::task;
use tracing::{debug, error, info};

type Reply<T> = RpcReplyPort<Result<T, GastosError>>;

/// Messages handled by the expenses actor. Each carries its reply port last.
#[derive(Debug)]
pub enum ExpensesActorMessage {
    ListAll(Reply<Vec<Expense>>),
    Find(u64, Reply<Expense>),
    Add(ExpenseInput, Reply<Expense>),
    Update(u64, ExpenseInput, Reply<Expense>),
    Delete(u64, Reply<()>),
    Monthly(i32, u32, Reply<Vec<Expense>>),
    Summary(Reply<Vec<MonthlySummary>>),
}

/// Handle for interacting with the expenses actor.
///
/// All calls, reads included, go through one mailbox, so load/mutate/save
/// cycles never interleave inside this process.
#[derive(Clone)]
pub struct ExpensesHandle {
    actor: ActorRef<ExpensesActorMessage>,
}

impl ExpensesHandle {
    pub async fn list_all(&self) -> Result<Vec<Expense>, GastosError> {
        ractor::call!(self.actor, ExpensesActorMessage::ListAll)
            .map_err(|e| GastosError::RactorError(format!("ListAll RPC failed: {e}")))?
    }

    pub async fn find(&self, id: u64) -> Result<Expense, GastosError> {
        ractor::call!(self.actor, ExpensesActorMessage::Find, id)
            .map_err(|e| GastosError::RactorError(format!("Find RPC failed: {e}")))?
    }

    pub async fn add(&self, input: ExpenseInput) -> Result<Expense, GastosError> {
        ractor::call!(self.actor, ExpensesActorMessage::Add, input)
            .map_err(|e| GastosError::RactorError(format!("Add RPC failed: {e}")))?
    }

    pub async fn update(&self, id: u64, input: ExpenseInput) -> Result<Expense, GastosError> {
        ractor::call!(self.actor, ExpensesActorMessage::Update, id, input)
            .map_err(|e| GastosError::RactorError(format!("Update RPC failed: {e}")))?
    }

    pub async fn delete(&self, id: u64) -> Result<(), GastosError> {
        ractor::call!(self.actor, ExpensesActorMessage::Delete, id)
            .map_err(|e| GastosError::RactorError(format!("Delete RPC failed: {e}")))?
    }

    pub async fn monthly(&self, year: i32, month: u32) -> Result<Vec<Expense>, GastosError> {
        ractor::call!(self.actor, ExpensesActorMessage::Monthly, year, month)
            .map_err(|e| GastosError::RactorError(format!("Monthly RPC failed: {e}")))?
    }

    pub async fn summary(&self) -> Result<Vec<MonthlySummary>, GastosError> {
        ractor::call!(self.actor, ExpensesActorMessage::Summary)
            .map_err(|e| GastosError::RactorError(format!("Summary RPC failed: {e}")))?
    }
}

/// ractor-based single writer over the expense file
struct ExpensesActor;

#[ractor::async_trait]
impl Actor for ExpensesActor {
    type Msg = ExpensesActorMessage;
    type State = ExpenseRepository;
    type Arguments = ExpenseRepository;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        repo: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        info!(
            path = %repo.file().path().display(),
            "ExpensesActor started"
        );
        Ok(repo)
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        repo: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        // Each call finishes before the next message is taken, so file
        // access stays serialized even though it runs off the async workers.
        let repo = repo.clone();
        match message {
            ExpensesActorMessage::ListAll(rp) => {
                let _ = rp.send(run_blocking("ListAll", move || repo.list_all()).await);
            }
            ExpensesActorMessage::Find(id, rp) => {
                let _ = rp.send(run_blocking("Find", move || repo.find(id)).await);
            }
            ExpensesActorMessage::Add(input, rp) => {
                let _ = rp.send(run_blocking("Add", move || repo.add(input)).await);
            }
            ExpensesActorMessage::Update(id, input, rp) => {
                let _ = rp.send(run_blocking("Update", move || repo.update(id, input)).await);
            }
            ExpensesActorMessage::Delete(id, rp) => {
                let _ = rp.send(run_blocking("Delete", move || repo.delete(id)).await);
            }
            ExpensesActorMessage::Monthly(year, month, rp) => {
                debug!(year, month, "monthly query");
                let result = run_blocking("Monthly", move || repo.monthly(year, month)).await;
                let _ = rp.send(result);
            }
            ExpensesActorMessage::Summary(rp) => {
                let _ = rp.send(run_blocking("Summary", move || repo.summary()).await);
            }
        }
        Ok(())
    }
}

/// Run a repository call on the blocking pool. A panic inside it comes back
/// as `StorageTask` instead of stopping the actor.
async fn run_blocking<T, F>(op: &'static str, f: F) -> Result<T, GastosError>
where
    F: FnOnce() -> Result<T, GastosError> + Send + 'static,
    T: Send + 'static,
{
    task::spawn_blocking(f).await.unwrap_or_else(|e| {
        error!(op, error = %e, "repository call did not complete");
        Err(GastosError::StorageTask(e))
    })
}

/// Spawn the expenses actor over `repo` and return a handle.
pub async fn spawn(repo: ExpenseRepository) -> Result<ExpensesHandle, GastosError> {
    let (actor, _jh) = Actor::spawn(None, ExpensesActor, repo)
        .await
        .map_err(|e| GastosError::RactorError(format!("failed to spawn ExpensesActor: {e}")))?;
    Ok(ExpensesHandle { actor })
}

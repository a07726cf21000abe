use dose_scheduler_infra::DoseContext;
use std::fmt::Debug;
use tracing::{error, info};

#[async_trait::async_trait]
pub trait UseCase: Debug + Send {
    type Response;
    type Error;

    const NAME: &'static str;

    async fn execute(&mut self, ctx: &DoseContext) -> Result<Self::Response, Self::Error>;
}

#[tracing::instrument(name = "Executing usecase", skip(usecase, ctx), fields(usecase = U::NAME))]
pub async fn execute<U>(mut usecase: U, ctx: &DoseContext) -> Result<U::Response, U::Error>
where
    U: UseCase,
    U::Error: Debug,
{
    let res = usecase.execute(ctx).await;

    match &res {
        Ok(_) => info!("Use case {} succeeded", U::NAME),
        Err(e) => error!("Use case {} error: {:?}", U::NAME, e),
    }

    res
}

use crate::error::{AppError, AppResult};
use crate::gacha::{self, DrawResult, PrizePool, Session, SessionState, TemplateDefinition};
use crate::services::result_service::{DrawRecorded, RecorderSender};
use crate::store::{SessionKey, SessionStore};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// 一次抽取的结果和抽取后的奖池统计
#[derive(Debug, Clone)]
pub struct DrawOutcome {
    pub result: DrawResult,
    pub remaining: usize,
    pub total: usize,
}

type SessionLocks = HashMap<SessionKey, Arc<AsyncMutex<()>>>;

/// 会话级抽取服务
///
/// 每个会话一把锁：同一会话同一时刻最多一次抽取，不同会话互不等待。
/// 抽取结果以奖池内存状态为准：保存会话或发送记录失败都只记日志。
#[derive(Clone)]
pub struct GachaService {
    store: Arc<dyn SessionStore>,
    locks: Arc<Mutex<SessionLocks>>,
    draw_delay: Duration,
    recorder: Option<RecorderSender>,
}

impl GachaService {
    pub fn new(
        store: Arc<dyn SessionStore>,
        draw_delay: Duration,
        recorder: Option<RecorderSender>,
    ) -> Self {
        Self {
            store,
            locks: Arc::new(Mutex::new(HashMap::new())),
            draw_delay,
            recorder,
        }
    }

    async fn lock_session(&self, key: &SessionKey) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            // 没有人持有或等待的锁可以丢掉
            locks.retain(|_, l| Arc::strong_count(l) > 1);
            locks.entry(key.clone()).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// 存储可能是文件，放到阻塞线程池执行
    async fn blocking<T, F>(&self, key: &SessionKey, op: F) -> AppResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn SessionStore, &SessionKey) -> AppResult<T> + Send + 'static,
    {
        let store = self.store.clone();
        let key = key.clone();
        tokio::task::spawn_blocking(move || op(store.as_ref(), &key))
            .await
            .map_err(|e| AppError::InternalError(format!("Session store task failed: {e}")))?
    }

    async fn load(&self, key: &SessionKey, defaults: &PrizePool) -> Session {
        let state = match self.blocking(key, |store, key| store.load(key)).await {
            Ok(state) => state,
            Err(e) => {
                log::warn!("Failed to load session {key}, using template defaults: {e}");
                None
            }
        };
        Session::restore(state, defaults)
    }

    async fn save(&self, key: &SessionKey, state: SessionState) -> AppResult<()> {
        self.blocking(key, move |store, key| store.save(key, &state))
            .await
    }

    pub async fn current(&self, key: &SessionKey, template: &TemplateDefinition) -> Session {
        let _guard = self.lock_session(key).await;
        self.load(key, &template.build_pool()).await
    }

    pub async fn draw(
        &self,
        key: &SessionKey,
        template: &TemplateDefinition,
        user_id: Option<i64>,
    ) -> AppResult<DrawOutcome> {
        let _guard = self.lock_session(key).await;

        if !self.draw_delay.is_zero() {
            tokio::time::sleep(self.draw_delay).await;
        }

        let mut session = self.load(key, &template.build_pool()).await;
        let result = gacha::draw(&mut session.pool);

        if let DrawResult::Drawn(item) = &result {
            session.history.push(item.clone());

            if let Err(e) = self.save(key, session.snapshot()).await {
                log::error!("Failed to save session {key}: {e}");
            }

            log::info!(
                "Drawn {} ({}) from {key}, {} remaining",
                item.id,
                item.tier,
                session.pool.remaining_count()
            );

            if let (Some(user_id), Some(recorder)) = (user_id, &self.recorder) {
                let event = DrawRecorded {
                    user_id,
                    template_id: template.id.clone(),
                    template_name: template.name.clone(),
                    item: item.clone(),
                };
                if recorder.send(event).is_err() {
                    log::error!("Result recorder is not running, result for {key} not saved");
                }
            }
        } else {
            log::info!("Pool {key} is exhausted");
        }

        Ok(DrawOutcome {
            result,
            remaining: session.pool.remaining_count(),
            total: session.pool.total_count(),
        })
    }

    /// 清空 drawn 标记和会话历史
    pub async fn reset(&self, key: &SessionKey, template: &TemplateDefinition) -> AppResult<Session> {
        let _guard = self.lock_session(key).await;

        let mut session = self.load(key, &template.build_pool()).await;
        gacha::reset(&mut session.pool);
        session.history.clear();

        self.blocking(key, |store, key| store.remove(key)).await?;
        log::info!("Session {key} reset");
        Ok(session)
    }
}

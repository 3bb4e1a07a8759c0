//! 级联选项加载服务
//!
//! One `DependentOptionLoader` per level; `LocationCascade` wires the three
//! levels together. Only the most recently triggered request of a level may
//! mutate that level's select.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::error::CoreResult;
use crate::services::{CancelableRequest, SelectResetter};
use crate::traits::OptionSource;
use crate::types::{FieldState, Level, LoadOutcome, SelectField, SelectOption};

/// 同一把锁保护的选择框模型与当前请求
struct LevelSlot {
    select: SelectField,
    active: Option<CancelableRequest>,
}

/// 级联选项加载器（每个级别一个）
pub struct DependentOptionLoader {
    level: Level,
    slot: Mutex<LevelSlot>,
    children: Vec<Arc<DependentOptionLoader>>,
    source: Arc<dyn OptionSource>,
    next_request_id: AtomicU64,
}

impl DependentOptionLoader {
    /// 创建加载器
    ///
    /// # Arguments
    /// * `level` - 本加载器负责的级别
    /// * `select_id` - 选择框 ID
    /// * `source` - 选项查询后端
    /// * `children` - 本级别触发或清空时一并重置的下级加载器
    #[must_use]
    pub fn new(
        level: Level,
        select_id: impl Into<String>,
        source: Arc<dyn OptionSource>,
        children: Vec<Arc<DependentOptionLoader>>,
    ) -> Self {
        Self {
            level,
            slot: Mutex::new(LevelSlot {
                select: SelectField::new(select_id, level.default_placeholder()),
                active: None,
            }),
            children,
            source,
            next_request_id: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LevelSlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn select_id(&self) -> String {
        self.lock().select.id.clone()
    }

    /// 获取选择框当前状态
    pub fn snapshot(&self) -> SelectField {
        self.lock().select.clone()
    }

    /// 本级别是否仍有未完成的查询
    pub fn has_active_request(&self) -> bool {
        self.lock().active.is_some()
    }

    /// 记录用户在本级别的选择
    pub fn select(&self, id: &str) -> bool {
        let found = self.lock().select.select_by_id(id);
        if !found {
            log::warn!("[{}] Selected id {id} is not among the loaded options", self.level);
        }
        found
    }

    /// 为 `parent_id` 加载本级别选项
    ///
    /// 取消旧请求、登记新请求以及重置本级和下级选择框，都在函数返回前同步完成。
    /// 返回的 future 负责执行查询并应用结果。
    pub fn trigger(self: &Arc<Self>, parent_id: Option<String>) -> BoxFuture<'static, LoadOutcome> {
        let endpoint = self.source.endpoint(self.level, parent_id.as_deref());
        let id = self.next_request_id.fetch_add(1, Ordering::Relaxed) + 1;
        let request = CancelableRequest::new(id, self.level, endpoint);

        {
            let mut slot = self.lock();
            if let Some(previous) = slot.active.replace(request.clone()) {
                log::debug!(
                    "[{}] Request #{} superseded by #{id} ({})",
                    self.level,
                    previous.id(),
                    previous.endpoint()
                );
                previous.cancel();
            }
            SelectResetter::reset(&mut slot.select, &self.level.loading_placeholder(), true);
            slot.select.state = FieldState::Loading;
        }

        for child in &self.children {
            child.clear();
        }

        let this = Arc::clone(self);
        async move {
            log::debug!("[{}] GET {} (#{})", this.level, request.endpoint(), request.id());
            let result = request
                .run(this.source.fetch_options(this.level, parent_id.as_deref()))
                .await;
            this.complete(&request, result)
        }
        .boxed()
    }

    /// 将本级及所有下级恢复为默认占位项，并取消未完成的查询
    pub fn clear(&self) {
        {
            let mut slot = self.lock();
            if let Some(previous) = slot.active.take() {
                log::debug!("[{}] Request #{} cancelled by reset", self.level, previous.id());
                previous.cancel();
            }
            SelectResetter::reset(&mut slot.select, &self.level.default_placeholder(), true);
            slot.select.state = FieldState::Idle;
        }

        for child in &self.children {
            child.clear();
        }
    }

    fn complete(
        &self,
        request: &CancelableRequest,
        result: CoreResult<Vec<SelectOption>>,
    ) -> LoadOutcome {
        let mut slot = self.lock();

        let is_current = slot
            .active
            .as_ref()
            .is_some_and(|active| active.id() == request.id());
        if !is_current || request.is_cancelled() {
            log::debug!(
                "[{}] Ignoring response of superseded request #{}",
                self.level,
                request.id()
            );
            return LoadOutcome::Superseded;
        }
        slot.active = None;

        match result {
            Ok(items) if items.is_empty() => {
                log::info!("[{}] {} returned no items", self.level, request.endpoint());
                SelectResetter::reset(&mut slot.select, &self.level.empty_placeholder(), true);
                slot.select.state = FieldState::Empty;
                LoadOutcome::Empty
            }
            Ok(items) => {
                let count = items.len();
                log::debug!("[{}] Loaded {count} options", self.level);
                SelectResetter::populate(&mut slot.select, &self.level.default_placeholder(), items);
                slot.select.state = FieldState::Populated;
                LoadOutcome::Populated(count)
            }
            Err(e) => {
                if e.is_expected() {
                    log::warn!("[{}] Failed to load options: {e}", self.level);
                } else {
                    log::error!("[{}] Failed to load options: {e}", self.level);
                }
                SelectResetter::reset(&mut slot.select, &self.level.error_placeholder(), true);
                slot.select.state = FieldState::Error;
                LoadOutcome::Failed(e)
            }
        }
    }
}

/// 邦 → 县 → 区块 三级联动
pub struct LocationCascade {
    state: Arc<DependentOptionLoader>,
    district: Arc<DependentOptionLoader>,
    block: Arc<DependentOptionLoader>,
}

impl LocationCascade {
    /// 使用默认选择框 ID 创建三个加载器
    #[must_use]
    pub fn new(source: Arc<dyn OptionSource>) -> Self {
        let block = Arc::new(DependentOptionLoader::new(
            Level::Block,
            Level::Block.select_id(),
            Arc::clone(&source),
            Vec::new(),
        ));
        let district = Arc::new(DependentOptionLoader::new(
            Level::District,
            Level::District.select_id(),
            Arc::clone(&source),
            vec![Arc::clone(&block)],
        ));
        let state = Arc::new(DependentOptionLoader::new(
            Level::State,
            Level::State.select_id(),
            source,
            vec![Arc::clone(&district)],
        ));

        Self {
            state,
            district,
            block,
        }
    }

    pub fn loader(&self, level: Level) -> &Arc<DependentOptionLoader> {
        match level {
            Level::State => &self.state,
            Level::District => &self.district,
            Level::Block => &self.block,
        }
    }

    /// 查找负责 `select_id` 的加载器
    pub fn loader_for_select(&self, select_id: &str) -> Option<&Arc<DependentOptionLoader>> {
        Level::ALL
            .into_iter()
            .map(|level| self.loader(level))
            .find(|loader| loader.select_id() == select_id)
    }

    /// 页面加载时触发顶级（邦）列表
    pub fn load_states(&self) -> BoxFuture<'static, LoadOutcome> {
        self.state.trigger(None)
    }

    pub fn select_state(&self, state_id: &str) -> Option<BoxFuture<'static, LoadOutcome>> {
        self.choose(Level::State, state_id)
    }

    pub fn select_district(&self, district_id: &str) -> Option<BoxFuture<'static, LoadOutcome>> {
        self.choose(Level::District, district_id)
    }

    pub fn select_block(&self, block_id: &str) -> bool {
        self.block.select(block_id)
    }

    /// 记录 `level` 上的选择并加载下一级
    ///
    /// 选中占位项（空 ID）时只清空下级、不发起查询，返回 `None`；最后一级的选择同样返回 `None`。
    pub fn choose(&self, level: Level, id: &str) -> Option<BoxFuture<'static, LoadOutcome>> {
        let loader = self.loader(level);
        let child = level.child().map(|child| self.loader(child));

        if id.is_empty() {
            loader.lock().select.selected_index = 0;
            if let Some(child) = child {
                child.clear();
            }
            return None;
        }

        loader.select(id);
        child.map(|child| child.trigger(Some(id.to_string())))
    }
}

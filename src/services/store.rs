//! 批次记录存储 - 业务能力层
//!
//! 独占批次列表，所有修改都把完整列表重新写回存储槽

use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult, StoreError};
use crate::infrastructure::StorageSlot;
use crate::models::batch::{Batch, BatchDraft, BatchPatch};
use crate::services::clock::Clock;
use crate::services::id_gen::IdGenerator;

/// 连续生成重复 ID 的最大容忍次数
const MAX_ID_ATTEMPTS: usize = 16;

/// 批次记录存储
///
/// 职责：
/// - 持有唯一的批次列表（按插入顺序）
/// - add / update / remove 后整体写回存储槽
/// - 存储槽内容缺失或无法解析时视为空列表
pub struct BatchStore<S: StorageSlot> {
    slot: S,
    batches: Vec<Batch>,
}

impl<S: StorageSlot> BatchStore<S> {
    /// 打开存储并读取已有批次
    pub fn open(slot: S) -> AppResult<Self> {
        let batches = decode(&slot)?;
        info!("存储槽 {} 已加载 {} 个批次", slot.name(), batches.len());
        Ok(Self { slot, batches })
    }

    /// 重新读取存储槽
    pub fn reload(&mut self) -> AppResult<()> {
        self.batches = decode(&self.slot)?;
        Ok(())
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    /// 所有批次（按插入顺序）
    pub fn list(&self) -> &[Batch] {
        &self.batches
    }

    pub fn get(&self, id: &str) -> Option<&Batch> {
        self.batches.iter().find(|batch| batch.id == id)
    }

    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// 新增批次：分配 id 与 createdAt，追加到末尾
    pub fn add(
        &mut self,
        draft: BatchDraft,
        clock: &dyn Clock,
        ids: &dyn IdGenerator,
    ) -> AppResult<Batch> {
        let id = self.fresh_id(ids)?;
        let batch = draft.into_batch(id, clock.now());

        let mut batches = self.batches.clone();
        batches.push(batch.clone());
        self.persist(batches)?;

        info!("新增批次 {} ({} / {})", batch.id, batch.batch_number, batch.supplier);
        Ok(batch)
    }

    /// 更新批次：合并补丁并刷新 updatedAt
    ///
    /// 批次不存在时返回 `StoreError::NotFound`，不写入
    pub fn update(&mut self, id: &str, patch: &BatchPatch, clock: &dyn Clock) -> AppResult<Batch> {
        let index = self
            .batches
            .iter()
            .position(|batch| batch.id == id)
            .ok_or_else(|| AppError::not_found(id))?;

        let mut batches = self.batches.clone();
        let batch = &mut batches[index];
        patch.apply_to(batch);
        batch.updated_at = Some(clock.now());
        let updated = batch.clone();
        self.persist(batches)?;

        info!("更新批次 {} ({})", updated.id, updated.batch_number);
        Ok(updated)
    }

    /// 删除批次；不存在时静默忽略，但仍会写回列表
    pub fn remove(&mut self, id: &str) -> AppResult<()> {
        let batches: Vec<Batch> = self
            .batches
            .iter()
            .filter(|batch| batch.id != id)
            .cloned()
            .collect();

        if batches.len() == self.batches.len() {
            debug!("删除的批次不存在: {}", id);
        } else {
            info!("删除批次 {}", id);
        }
        self.persist(batches)
    }

    /// 按批次号或供应商搜索（不区分大小写的子串匹配）
    ///
    /// 查询为空或缺失时返回全部批次；保持原有顺序
    pub fn search(&self, query: Option<&str>) -> Vec<&Batch> {
        let needle = match query {
            Some(q) if !q.is_empty() => q.to_lowercase(),
            _ => return self.batches.iter().collect(),
        };
        self.batches
            .iter()
            .filter(|batch| {
                batch.batch_number.to_lowercase().contains(&needle)
                    || batch.supplier.to_lowercase().contains(&needle)
            })
            .collect()
    }

    fn fresh_id(&self, ids: &dyn IdGenerator) -> AppResult<String> {
        let mut last = String::new();
        for _ in 0..MAX_ID_ATTEMPTS {
            last = ids.next_id();
            if self.get(&last).is_none() {
                return Ok(last);
            }
            warn!("生成的 ID 已存在，重新生成: {}", last);
        }
        Err(StoreError::DuplicateId {
            last,
            attempts: MAX_ID_ATTEMPTS,
        }
        .into())
    }

    /// 写回完整列表，成功后才替换内存中的列表
    fn persist(&mut self, batches: Vec<Batch>) -> AppResult<()> {
        let bytes = serde_json::to_vec(&batches)?;
        self.slot.save(&bytes)?;
        self.batches = batches;
        Ok(())
    }
}

fn decode<S: StorageSlot>(slot: &S) -> AppResult<Vec<Batch>> {
    let Some(bytes) = slot.load()? else {
        return Ok(Vec::new());
    };
    match serde_json::from_slice::<Vec<Batch>>(&bytes) {
        Ok(batches) => Ok(batches),
        Err(e) => {
            warn!("存储槽 {} 的内容无法解析，按空列表处理: {}", slot.name(), e);
            Ok(Vec::new())
        }
    }
}

//! 无放回加权抽取
//!
//! 采样权重 = 100 - 名义概率 + 1。该公式会让名义概率更低的稀有等级拿到更大的
//! 采样权重（0.5 -> 100.5，62 -> 39），这里按原样保留。
//! 线性扫描 + 累减，平局按奖池顺序先到先得；浮点残差导致扫描落空时取最后一个未抽中条目。

use super::item::{PrizeItem, PrizePool};
use rand::Rng;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawResult {
    /// 本次抽中的条目快照（drawn 已置为 true）
    Drawn(PrizeItem),
    /// 奖池已无未抽取条目
    Exhausted,
}

impl DrawResult {
    pub fn item(&self) -> Option<&PrizeItem> {
        match self {
            DrawResult::Drawn(item) => Some(item),
            DrawResult::Exhausted => None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, DrawResult::Exhausted)
    }
}

pub fn sampling_weight(item: &PrizeItem) -> f64 {
    100.0 - item.weight + 1.0
}

pub fn draw(pool: &mut PrizePool) -> DrawResult {
    draw_with_rng(pool, &mut rand::thread_rng())
}

pub fn draw_with_rng<R: Rng + ?Sized>(pool: &mut PrizePool, rng: &mut R) -> DrawResult {
    draw_with_unit(pool, rng.r#gen::<f64>())
}

/// `unit` 为 [0, 1) 内的均匀随机数，r = unit * totalWeight
pub fn draw_with_unit(pool: &mut PrizePool, unit: f64) -> DrawResult {
    let candidates: Vec<usize> = pool
        .items
        .iter()
        .enumerate()
        .filter(|(_, item)| !item.drawn)
        .map(|(idx, _)| idx)
        .collect();

    if candidates.is_empty() {
        return DrawResult::Exhausted;
    }

    let total_weight: f64 = candidates
        .iter()
        .map(|&idx| sampling_weight(&pool.items[idx]))
        .sum();

    let selected = pick(&pool.items, &candidates, unit * total_weight);

    let item = &mut pool.items[selected];
    item.drawn = true;
    DrawResult::Drawn(item.clone())
}

fn pick(items: &[PrizeItem], candidates: &[usize], mut r: f64) -> usize {
    for &idx in candidates {
        r -= sampling_weight(&items[idx]);
        if r <= 0.0 {
            return idx;
        }
    }
    // 浮点残差
    candidates[candidates.len() - 1]
}

pub fn reset(pool: &mut PrizePool) {
    for item in pool.items.iter_mut() {
        item.drawn = false;
    }
}

use serde::{Deserialize, Serialize};

/// 难度等级
///
/// 题库中的难度字段是自由文本，这里只用于请求和回退策略，
/// 查询时仍然按大小写不敏感的前缀匹配
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// 固定的处理顺序：easy → medium → hard
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// 题库中的规范标签
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// 请求名（小写）
    pub fn key(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// 组卷时依次尝试的标签
    ///
    /// 只有 easy 可以回退到 Medium，且是整体回退，不合并两个题池
    pub fn fallback_labels(&self) -> &'static [&'static str] {
        match self {
            Difficulty::Easy => &["Easy", "Medium"],
            Difficulty::Medium => &["Medium"],
            Difficulty::Hard => &["Hard"],
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// 每个难度请求的题目数量，0 表示跳过该难度
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyCounts {
    pub easy: usize,
    pub medium: usize,
    pub hard: usize,
}

impl DifficultyCounts {
    pub fn new(easy: usize, medium: usize, hard: usize) -> Self {
        Self { easy, medium, hard }
    }

    pub fn get(&self, tier: Difficulty) -> usize {
        match tier {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }

    /// 按固定顺序返回 (难度, 数量)
    pub fn tiers(&self) -> [(Difficulty, usize); 3] {
        Difficulty::ALL.map(|tier| (tier, self.get(tier)))
    }

    pub fn total(&self) -> usize {
        self.easy + self.medium + self.hard
    }
}

impl std::fmt::Display for DifficultyCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Easy: {}, Medium: {}, Hard: {}",
            self.easy, self.medium, self.hard
        )
    }
}

//! Quick-pick symptom catalogue
//!
//! Symptoms are numbered 1..=N across all categories in catalogue order, so
//! `/pick 5` is stable for the lifetime of the binary.

/// One catalogue group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymptomCategory {
    pub name: &'static str,
    pub symptoms: &'static [&'static str],
}

pub static CATALOGUE: [SymptomCategory; 7] = [
    SymptomCategory {
        name: "疲劳乏力",
        symptoms: &["容易疲劳", "精神不振", "四肢无力", "气短懒言"],
    },
    SymptomCategory {
        name: "睡眠问题",
        symptoms: &["失眠多梦", "入睡困难", "早醒", "睡眠质量差", "嗜睡"],
    },
    SymptomCategory {
        name: "消化系统",
        symptoms: &["食欲不振", "腹胀", "便秘", "腹泻", "恶心", "胃痛"],
    },
    SymptomCategory {
        name: "头部症状",
        symptoms: &["头痛", "头晕", "头重", "耳鸣"],
    },
    SymptomCategory {
        name: "情绪相关",
        symptoms: &["易怒", "焦虑", "抑郁", "心烦", "情绪低落"],
    },
    SymptomCategory {
        name: "疼痛不适",
        symptoms: &["腰痛", "关节痛", "肌肉酸痛", "胸闷", "心悸"],
    },
    SymptomCategory {
        name: "其他症状",
        symptoms: &["怕冷", "怕热", "出汗异常", "口干", "口苦", "咽干"],
    },
];

/// Separator used when joining picked symptoms
pub const JOIN_SEPARATOR: &str = "、";

/// All symptoms with their 1-based pick numbers
pub fn numbered() -> impl Iterator<Item = (usize, &'static str)> {
    CATALOGUE
        .iter()
        .flat_map(|c| c.symptoms.iter().copied())
        .enumerate()
        .map(|(i, s)| (i + 1, s))
}

/// Symptom for a 1-based pick number
pub fn by_number(n: usize) -> Option<&'static str> {
    numbered().find(|(i, _)| *i == n).map(|(_, s)| s)
}

/// Number of pickable symptoms
pub fn total() -> usize {
    CATALOGUE.iter().map(|c| c.symptoms.len()).sum()
}

/// Selected quick-pick symptoms, in pick order, without duplicates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymptomPicks {
    selected: Vec<String>,
}

impl SymptomPicks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a symptom; returns false if it was already selected
    pub fn pick(&mut self, symptom: &str) -> bool {
        if self.selected.iter().any(|s| s == symptom) {
            return false;
        }
        self.selected.push(symptom.to_string());
        true
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Selections joined with `、`
    pub fn joined(&self) -> String {
        self.selected.join(JOIN_SEPARATOR)
    }

    /// Analysis text: picks first, then any free-text supplement
    pub fn compose(&self, extra: &str) -> String {
        let extra = extra.trim();
        match (self.is_empty(), extra.is_empty()) {
            (true, _) => extra.to_string(),
            (false, true) => self.joined(),
            (false, false) => format!("{}{}{}", self.joined(), JOIN_SEPARATOR, extra),
        }
    }
}

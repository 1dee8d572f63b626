//! Wellness tips and fixed guidance copy

use rand::seq::SliceRandom;
use rand::Rng;

pub const TIPS: [&str; 5] = [
    "🌅 早睡早起，顺应自然",
    "🥗 饮食有节，营养均衡",
    "🧘 适度运动，量力而行",
    "😊 心态平和，情志舒畅",
    "💧 多喝温水，促进代谢",
];

pub const DISCLAIMER: &str =
    "⚠️ 免责声明：本应用仅提供养生保健参考建议，不能替代专业医疗诊断和治疗。如有严重或持续症状，请及时就医咨询专业医师。";

pub const AFTER_ANALYSIS: &str = "💡 温馨提示：以上建议仅供参考，具体情况请咨询专业中医师。";

/// Situations that need a doctor right away
pub const URGENT_CARE: [&str; 6] = [
    "急性剧烈疼痛",
    "持续高热不退",
    "呼吸困难",
    "意识模糊",
    "大量出血",
    "症状急剧恶化",
];

/// Situations that need a doctor soon
pub const TIMELY_CARE: [&str; 4] = [
    "症状持续超过2周",
    "症状反复发作",
    "影响正常生活",
    "有基础疾病",
];

pub fn tip_with<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    TIPS.choose(rng).copied().unwrap_or(TIPS[0])
}

pub fn random_tip() -> &'static str {
    tip_with(&mut rand::thread_rng())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_tip_comes_from_list() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            assert!(TIPS.contains(&tip_with(&mut rng)));
        }
        assert!(TIPS.contains(&random_tip()));
    }
}

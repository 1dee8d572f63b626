//! Instruction templates
//!
//! Fixed prompt text for both lanes. Every function here is a pure function
//! of its inputs: no clock, no randomness, no I/O.

use crate::llm::types::{Age, AnalysisRequest, PromptPreset, UserProfile};

/// Version of the section header contract below.
///
/// Bump whenever a header string changes; the UI section splitter keys on
/// these exact strings.
pub const SECTION_CONTRACT_VERSION: u32 = 1;

pub const SECTION_PATTERN_ANALYSIS: &str = "## 一、中医辨证分析";
pub const SECTION_RECOMMENDATIONS: &str = "## 二、养生建议";
pub const SECTION_CAUTIONS: &str = "## 三、注意事项";

/// All top-level section headers, in output order
pub const SECTION_HEADERS: [&str; 3] = [
    SECTION_PATTERN_ANALYSIS,
    SECTION_RECOMMENDATIONS,
    SECTION_CAUTIONS,
];

/// Substring identifying the scripted opening message
pub const GREETING_MARKER: &str = "我是您的中医养生小助手";

/// Directive used whenever the user did not give an age
pub const AGE_NOT_PROVIDED: &str =
    "未提供（用户未填写年龄，请勿推测或假设其具体年龄，给出适用于不同年龄段的通用建议）";

/// Scripted opening message shown at the top of every chat
///
/// UI chrome only; the history window strips it before any request.
pub fn greeting() -> String {
    format!(
        "您好！{GREETING_MARKER} 🌿\n\
         请告诉我您最近有哪些不适，例如疲劳、失眠、食欲不振等，\
         也可以说说症状持续了多久。\n\
         ⚠️ 本助手仅提供养生保健参考，不能替代专业医疗诊断。"
    )
}

fn age_line(age: Option<Age>) -> String {
    match age {
        Some(age) => format!("{}岁", age.years()),
        None => AGE_NOT_PROVIDED.to_string(),
    }
}

/// System instruction for single-shot analysis
pub fn system_prompt(preset: PromptPreset) -> String {
    match preset {
        PromptPreset::Basic => "你是一位中医养生顾问，根据用户描述的症状给出通俗易懂的养生建议。

重要原则：
- 这只是养生建议，不能替代专业医疗诊断
- 症状严重或持续时，明确建议用户就医
- 不推荐具体药物，可以提及食疗和生活方式调整
- 回答要结构化、条理清晰"
            .to_string(),
        PromptPreset::Detailed => "你是一位专业的中医养生顾问，精通中医理论，包括阴阳五行、脏腑经络、气血津液等理论体系。

你的职责是：
1. 根据用户描述的症状，从中医角度进行辨证分析
2. 提供个性化的养生建议，包括饮食、作息、运动等方面
3. 用通俗易懂的语言解释中医概念，让普通人也能理解

重要原则：
- 始终强调这是养生建议，不能替代专业医疗诊断
- 如果症状严重或持续，明确建议用户就医
- 避免推荐具体药物，可以提及食疗和生活方式调整
- 用户未提供的信息（如年龄）不要自行推测或编造
- 保持客观、专业、温和的语气
- 回答要结构化、条理清晰，并严格使用给定的章节标题"
            .to_string(),
    }
}

/// Task instruction for single-shot analysis
///
/// Embeds the symptoms verbatim plus the metadata under fixed labels, then
/// the section template. Headers come from [`SECTION_HEADERS`].
pub fn analysis_prompt(request: &AnalysisRequest, preset: PromptPreset) -> String {
    let mut prompt = format!(
        "请根据以下信息进行中医养生分析：

【基本信息】
- 年龄：{age}
- 性别：{gender}
- 症状持续时间：{duration}

【症状描述】
{symptoms}

请按以下结构提供分析和建议：

",
        age = age_line(request.age),
        gender = request.gender.label(),
        duration = request.duration.label(),
        symptoms = request.symptoms,
    );

    match preset {
        PromptPreset::Basic => {
            prompt.push_str(&format!(
                "{SECTION_PATTERN_ANALYSIS}
简要说明可能的证型及其与症状的对应关系。

{SECTION_RECOMMENDATIONS}
分别从饮食、作息、运动三个方面给出具体可行的建议。

{SECTION_CAUTIONS}
说明需要留意的症状变化，以及什么情况下应该就医。"
            ));
        }
        PromptPreset::Detailed => {
            prompt.push_str(&format!(
                "{SECTION_PATTERN_ANALYSIS}
从中医角度分析可能的证型（如气虚、血虚、阴虚、阳虚、气滞、血瘀、痰湿等），解释症状与证型的对应关系。

{SECTION_RECOMMENDATIONS}

### 1. 饮食调理
- 推荐的食物和食疗方
- 应避免的食物
- 饮食习惯建议

### 2. 生活起居
- 作息时间建议
- 睡眠质量改善方法
- 情绪调节建议

### 3. 运动养生
- 适合的运动类型
- 运动强度和时长建议
- 可以尝试的传统养生功法（如八段锦、太极等）

### 4. 其他调理方法
- 穴位按摩建议
- 泡脚或其他外治方法
- 季节养生注意事项

{SECTION_CAUTIONS}
- 需要特别注意的症状变化
- 什么情况下应该就医
- 预期的调理周期

请确保建议科学、安全、易于实施。"
            ));
        }
    }

    prompt
}

/// System instruction for the multi-turn chat lane
///
/// Parameterised by the profile; the profile never enters the transcript.
pub fn chat_system_prompt(profile: &UserProfile, preset: PromptPreset) -> String {
    let mut prompt = String::from(
        "你是一位温和、专业的中医养生顾问，正在与用户进行多轮对话。\n\n",
    );

    prompt.push_str("【用户信息】\n");
    prompt.push_str(&format!("- 年龄：{}\n", age_line(profile.age)));
    prompt.push_str(&format!("- 性别：{}\n\n", profile.gender.label()));

    prompt.push_str("对话要求：\n");
    match preset {
        PromptPreset::Basic => {
            prompt.push_str(
                "- 信息不足时先追问一两个关键问题，再给出建议\n\
                 - 每次回复简洁明了，控制在三百字以内\n",
            );
        }
        PromptPreset::Detailed => {
            prompt.push_str(
                "- 结合之前的对话内容理解用户的问题，不要重复询问已回答的信息\n\
                 - 信息不足时先追问关键细节（持续时间、发生频率、伴随症状、加重或缓解因素）\n\
                 - 信息充分时，从中医辨证角度解释可能的证型，并给出饮食、作息、运动方面的具体建议\n\
                 - 每次回复控制在五百字以内，条理清晰\n",
            );
        }
    }
    prompt.push_str(
        "- 始终说明这是养生建议，不能替代专业医疗诊断\n\
         - 避免推荐具体药物\n\
         - 出现急性剧烈疼痛、持续高热、呼吸困难、意识模糊、大量出血等情况时，立即建议就医\n\
         - 用户未提供的信息不要自行推测或编造",
    );

    prompt
}

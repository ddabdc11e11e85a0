//! Translation lookup for the three supported languages.
//!
//! `t(lang, key)` returns the localized string, or the key itself when the
//! table has no entry, so a missing translation is visible but never fatal.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::models::enums::RiskCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Lang {
    #[default]
    Ru,
    Kz,
    En,
}

impl Lang {
    pub const ALL: [Lang; 3] = [Lang::Ru, Lang::Kz, Lang::En];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ru => "ru",
            Self::Kz => "kz",
            Self::En => "en",
        }
    }

    /// Language name used inside model instructions.
    pub fn language_name(&self) -> &'static str {
        match self {
            Self::Ru => "Russian",
            Self::Kz => "Kazakh",
            Self::En => "English",
        }
    }
}

/// Unrecognised tags resolve to English.
impl From<String> for Lang {
    fn from(tag: String) -> Self {
        match tag.trim() {
            "ru" => Self::Ru,
            "kz" => Self::Kz,
            _ => Self::En,
        }
    }
}

type Table = &'static [(&'static str, &'static str)];

const RU: Table = &[
    ("app.name", "CardioCheck"),
    ("nav.home", "Главная"),
    ("nav.analysis", "Анализ"),
    ("nav.hospitals", "Больницы"),
    ("nav.chart", "График"),
    ("nav.about", "О нас"),
    ("nav.medicine", "Лекарства"),
    ("nav.feedback", "Отзывы"),
    ("nav.auth", "Войти"),
    ("analysis.title", "Анализ состояния сердца"),
    ("analysis.step.symptoms", "Симптомы"),
    ("analysis.step.freeText", "Ваши ощущения"),
    ("analysis.step.diet", "Питание"),
    ("analysis.step.activity", "Активность"),
    ("analysis.step.blood", "Анализ крови"),
    ("analysis.next", "Далее"),
    ("analysis.back", "Назад"),
    ("analysis.submit", "Отправить на анализ"),
    ("analysis.skipBlood", "Пропустить и отправить"),
    ("analysis.loading", "Идёт анализ..."),
    ("analysis.yes", "Да"),
    ("analysis.no", "Нет"),
    ("analysis.sometimes", "Иногда"),
    ("analysis.symptoms.q1", "Испытываете ли вы боль или дискомфорт в груди при физической нагрузке?"),
    ("analysis.symptoms.q2", "Бывает ли у вас одышка при лёгкой нагрузке?"),
    ("analysis.symptoms.q3", "Ощущаете ли вы учащённое или нерегулярное сердцебиение?"),
    ("analysis.symptoms.q4", "Отекают ли у вас лодыжки или ноги?"),
    ("analysis.symptoms.q5", "Бывают ли у вас головокружения или обмороки?"),
    ("analysis.symptoms.q6", "Испытываете ли вы необычную усталость?"),
    ("analysis.symptoms.q7", "Отдаёт ли боль в руку, челюсть или спину?"),
    ("analysis.symptoms.q8", "Просыпаетесь ли вы ночью от нехватки воздуха?"),
    ("analysis.symptoms.q9", "Бывает ли у вас повышенное артериальное давление?"),
    ("analysis.symptoms.q10", "Были ли у ваших близких родственников болезни сердца?"),
    ("analysis.blood.cholesterol", "Общий холестерин (ммоль/л)"),
    ("analysis.blood.hdl", "ЛПВП (ммоль/л)"),
    ("analysis.blood.ldl", "ЛПНП (ммоль/л)"),
    ("analysis.blood.triglycerides", "Триглицериды (ммоль/л)"),
    ("analysis.blood.glucose", "Глюкоза (ммоль/л)"),
    ("analysis.blood.hemoglobin", "Гемоглобин (г/л)"),
    ("results.level.low.verdict", "Ваше сердце в хорошем состоянии. Продолжайте здоровый образ жизни!"),
    ("results.level.low.measure.1", "Поддерживать регулярные физические нагрузки"),
    ("results.level.low.measure.2", "Сбалансированное питание"),
    ("results.level.low.measure.3", "Регулярный сон 7-8 часов"),
    ("results.level.moderate.verdict", "Есть некоторые риски. Рекомендуем обратиться к кардиологу для профилактического обследования."),
    ("results.level.moderate.measure.1", "Записаться на приём к кардиологу"),
    ("results.level.moderate.measure.2", "Измерять давление 2 раза в день"),
    ("results.level.moderate.measure.3", "Снизить потребление соли"),
    ("results.level.moderate.measure.4", "Начать лёгкие кардио-упражнения"),
    ("results.level.moderate.measure.5", "Избегать стрессовых ситуаций"),
    ("results.level.high.verdict", "Выявлены значительные факторы риска. Настоятельно рекомендуем срочно обратиться к врачу!"),
    ("results.level.high.measure.1", "Немедленно обратиться к кардиологу"),
    ("results.level.high.measure.2", "Вызвать скорую при острых симптомах"),
    ("results.level.high.measure.3", "Полный покой до осмотра врача"),
    ("results.level.high.measure.4", "Принять аспирин (если нет противопоказаний)"),
    ("results.level.high.measure.5", "Избегать любых физических нагрузок"),
    ("results.hospitalMessage", "Рекомендуем обратиться в кардиологический центр."),
    ("chart.title", "График здоровья"),
    ("chart.normal", "Норма"),
    ("chart.symptoms", "Симптомы"),
    ("chart.blood", "Анализ крови"),
    ("chart.needAuth", "Войдите, чтобы увидеть свой график"),
    ("auth.defaultName", "Пользователь"),
    ("medicine.fallback.purpose", "Не удалось определить"),
    ("medicine.fallback.advice", "Обратитесь к фармацевту для уточнения."),
    ("feedback.title", "Отзывы"),
];

const KZ: Table = &[
    ("app.name", "CardioCheck"),
    ("nav.home", "Басты бет"),
    ("nav.analysis", "Талдау"),
    ("nav.hospitals", "Ауруханалар"),
    ("nav.chart", "График"),
    ("nav.about", "Біз туралы"),
    ("nav.medicine", "Дәрілер"),
    ("nav.feedback", "Пікірлер"),
    ("nav.auth", "Кіру"),
    ("analysis.title", "Жүрек жағдайын талдау"),
    ("analysis.step.symptoms", "Белгілер"),
    ("analysis.step.freeText", "Сезімдеріңіз"),
    ("analysis.step.diet", "Тамақтану"),
    ("analysis.step.activity", "Белсенділік"),
    ("analysis.step.blood", "Қан анализі"),
    ("analysis.next", "Келесі"),
    ("analysis.back", "Артқа"),
    ("analysis.submit", "Талдауға жіберу"),
    ("analysis.skipBlood", "Өткізіп жіберу және жіберу"),
    ("analysis.loading", "Талдау жүріп жатыр..."),
    ("analysis.yes", "Иә"),
    ("analysis.no", "Жоқ"),
    ("analysis.sometimes", "Кейде"),
    ("analysis.symptoms.q1", "Физикалық жүктеме кезінде кеудеңізде ауырсыну немесе жайсыздық бола ма?"),
    ("analysis.symptoms.q2", "Жеңіл жүктеме кезінде ентігу бола ма?"),
    ("analysis.symptoms.q3", "Жүрегіңіздің жиі немесе тұрақсыз соғуын сезесіз бе?"),
    ("analysis.symptoms.q4", "Тобығыңыз немесе аяғыңыз ісіне ме?"),
    ("analysis.symptoms.q5", "Басыңыз айналып немесе есіңізден танып қалған кездер бола ма?"),
    ("analysis.symptoms.q6", "Әдеттен тыс шаршау сезінесіз бе?"),
    ("analysis.symptoms.q7", "Ауырсыну қолға, жаққа немесе арқаға беріле ме?"),
    ("analysis.symptoms.q8", "Түнде ауа жетіспегеннен оянасыз ба?"),
    ("analysis.symptoms.q9", "Артериялық қысымыңыз жоғарылай ма?"),
    ("analysis.symptoms.q10", "Жақын туыстарыңызда жүрек аурулары болды ма?"),
    ("analysis.blood.cholesterol", "Жалпы холестерин (ммоль/л)"),
    ("analysis.blood.hdl", "ЖТЛП (ммоль/л)"),
    ("analysis.blood.ldl", "ТТЛП (ммоль/л)"),
    ("analysis.blood.triglycerides", "Триглицеридтер (ммоль/л)"),
    ("analysis.blood.glucose", "Глюкоза (ммоль/л)"),
    ("analysis.blood.hemoglobin", "Гемоглобин (г/л)"),
    ("results.level.low.verdict", "Жүрегіңіз жақсы жағдайда. Салауатты өмір салтын жалғастырыңыз!"),
    ("results.level.low.measure.1", "Тұрақты физикалық жүктемені сақтау"),
    ("results.level.low.measure.2", "Теңдестірілген тамақтану"),
    ("results.level.low.measure.3", "7-8 сағат ұйқы"),
    ("results.level.moderate.verdict", "Кейбір қауіптер бар. Профилактикалық тексеру үшін кардиологқа хабарласуды ұсынамыз."),
    ("results.level.moderate.measure.1", "Кардиологқа жазылу"),
    ("results.level.moderate.measure.2", "Қысымды күніне 2 рет өлшеу"),
    ("results.level.moderate.measure.3", "Тұз тұтынуды азайту"),
    ("results.level.moderate.measure.4", "Жеңіл кардио жаттығуларды бастау"),
    ("results.level.moderate.measure.5", "Стресстен аулақ болу"),
    ("results.level.high.verdict", "Маңызды қауіп факторлары анықталды. Дәрігерге шұғыл хабарласуды ұсынамыз!"),
    ("results.level.high.measure.1", "Кардиологқа дереу хабарласу"),
    ("results.level.high.measure.2", "Өткір симптомдарда жедел жәрдем шақыру"),
    ("results.level.high.measure.3", "Дәрігер тексергенше толық демалу"),
    ("results.level.high.measure.4", "Аспирин қабылдау (қарсы көрсетілімдер болмаса)"),
    ("results.level.high.measure.5", "Кез келген физикалық жүктемеден аулақ болу"),
    ("results.hospitalMessage", "Кардиологиялық орталыққа хабарласуды ұсынамыз."),
    ("chart.title", "Денсаулық графигі"),
    ("chart.normal", "Қалыпты"),
    ("chart.symptoms", "Белгілер"),
    ("chart.blood", "Қан анализі"),
    ("chart.needAuth", "Графикті көру үшін кіріңіз"),
    ("auth.defaultName", "Пайдаланушы"),
    ("medicine.fallback.purpose", "Анықтау мүмкін болмады"),
    ("medicine.fallback.advice", "Нақтылау үшін фармацевтке хабарласыңыз."),
    ("feedback.title", "Пікірлер"),
];

const EN: Table = &[
    ("app.name", "CardioCheck"),
    ("nav.home", "Home"),
    ("nav.analysis", "Analysis"),
    ("nav.hospitals", "Hospitals"),
    ("nav.chart", "Chart"),
    ("nav.about", "About"),
    ("nav.medicine", "Medicine"),
    ("nav.feedback", "Feedback"),
    ("nav.auth", "Sign in"),
    ("analysis.title", "Heart Health Analysis"),
    ("analysis.step.symptoms", "Symptoms"),
    ("analysis.step.freeText", "How you feel"),
    ("analysis.step.diet", "Diet"),
    ("analysis.step.activity", "Activity"),
    ("analysis.step.blood", "Blood test"),
    ("analysis.next", "Next"),
    ("analysis.back", "Back"),
    ("analysis.submit", "Submit for analysis"),
    ("analysis.skipBlood", "Skip and submit"),
    ("analysis.loading", "Analyzing..."),
    ("analysis.yes", "Yes"),
    ("analysis.no", "No"),
    ("analysis.sometimes", "Sometimes"),
    ("analysis.symptoms.q1", "Do you feel chest pain or discomfort during physical exertion?"),
    ("analysis.symptoms.q2", "Do you get short of breath during light activity?"),
    ("analysis.symptoms.q3", "Do you notice a rapid or irregular heartbeat?"),
    ("analysis.symptoms.q4", "Do your ankles or legs swell?"),
    ("analysis.symptoms.q5", "Do you experience dizziness or fainting?"),
    ("analysis.symptoms.q6", "Do you feel unusual fatigue?"),
    ("analysis.symptoms.q7", "Does pain spread to your arm, jaw or back?"),
    ("analysis.symptoms.q8", "Do you wake up at night short of breath?"),
    ("analysis.symptoms.q9", "Do you have elevated blood pressure readings?"),
    ("analysis.symptoms.q10", "Have close relatives had heart disease?"),
    ("analysis.blood.cholesterol", "Total cholesterol (mmol/L)"),
    ("analysis.blood.hdl", "HDL (mmol/L)"),
    ("analysis.blood.ldl", "LDL (mmol/L)"),
    ("analysis.blood.triglycerides", "Triglycerides (mmol/L)"),
    ("analysis.blood.glucose", "Glucose (mmol/L)"),
    ("analysis.blood.hemoglobin", "Hemoglobin (g/L)"),
    ("results.level.low.verdict", "Your heart is in good condition. Keep up a healthy lifestyle!"),
    ("results.level.low.measure.1", "Maintain regular exercise"),
    ("results.level.low.measure.2", "Balanced diet"),
    ("results.level.low.measure.3", "Regular 7-8 hours sleep"),
    ("results.level.moderate.verdict", "There are some risks. We recommend visiting a cardiologist for a preventive examination."),
    ("results.level.moderate.measure.1", "Schedule cardiologist appointment"),
    ("results.level.moderate.measure.2", "Measure BP twice daily"),
    ("results.level.moderate.measure.3", "Reduce salt intake"),
    ("results.level.moderate.measure.4", "Start light cardio"),
    ("results.level.moderate.measure.5", "Avoid stress"),
    ("results.level.high.verdict", "Significant risk factors detected. We strongly recommend an urgent doctor visit!"),
    ("results.level.high.measure.1", "See a cardiologist immediately"),
    ("results.level.high.measure.2", "Call emergency for acute symptoms"),
    ("results.level.high.measure.3", "Complete rest until doctor visit"),
    ("results.level.high.measure.4", "Take aspirin (if no contraindications)"),
    ("results.level.high.measure.5", "Avoid physical activity"),
    ("results.hospitalMessage", "We recommend contacting a cardiology center."),
    ("chart.title", "Health Chart"),
    ("chart.normal", "Normal"),
    ("chart.symptoms", "Symptoms"),
    ("chart.blood", "Blood test"),
    ("chart.needAuth", "Sign in to see your chart"),
    ("auth.defaultName", "User"),
    ("medicine.fallback.purpose", "Could not determine"),
    ("medicine.fallback.advice", "Consult a pharmacist for clarification."),
    ("feedback.title", "Feedback"),
];

static TRANSLATIONS: LazyLock<HashMap<Lang, HashMap<&'static str, &'static str>>> =
    LazyLock::new(|| {
        [(Lang::Ru, RU), (Lang::Kz, KZ), (Lang::En, EN)]
            .into_iter()
            .map(|(lang, table)| (lang, table.iter().copied().collect()))
            .collect()
    });

fn lookup(lang: Lang, key: &str) -> Option<&'static str> {
    TRANSLATIONS.get(&lang).and_then(|table| table.get(key)).copied()
}

/// Localized text for `key`, or `key` itself when untranslated.
pub fn t<'a>(lang: Lang, key: &'a str) -> &'a str {
    lookup(lang, key).unwrap_or(key)
}

/// Verdict and measures shown when the remote analysis is unavailable.
pub fn local_verdict(lang: Lang, category: RiskCategory) -> (String, Vec<String>) {
    // The local scorer never yields Critical; treat it as High.
    let level = match category {
        RiskCategory::Low => "low",
        RiskCategory::Moderate => "moderate",
        RiskCategory::High | RiskCategory::Critical => "high",
    };
    let verdict = t(lang, &format!("results.level.{level}.verdict")).to_string();
    let measures = (1..=5)
        .map(|i| format!("results.level.{level}.measure.{i}"))
        .filter_map(|key| lookup(lang, &key).map(str::to_string))
        .collect();
    (verdict, measures)
}

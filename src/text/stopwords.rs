use std::collections::HashSet;

use once_cell::sync::Lazy;

/// A compact Russian stop-word list covering pronouns, conjunctions,
/// prepositions, and particles — the closed-class words the tokenizer and
/// miner drop before similarity is computed.
static RUSSIAN_STOPWORDS: Lazy<HashSet<String>> = Lazy::new(|| {
    const WORDS: &[&str] = &[
        "и", "в", "во", "не", "что", "он", "на", "я", "с", "со", "как", "а",
        "то", "все", "она", "так", "его", "но", "да", "ты", "к", "у", "же",
        "вы", "за", "бы", "по", "только", "ее", "мне", "было", "вот", "от",
        "меня", "еще", "нет", "о", "из", "ему", "теперь", "когда", "даже",
        "ну", "вдруг", "ли", "если", "уже", "или", "ни", "быть", "был",
        "него", "до", "вас", "нибудь", "опять", "уж", "вам", "сказал",
        "ведь", "там", "потом", "себя", "ничего", "ей", "может", "они",
        "тут", "где", "есть", "надо", "ней", "для", "мы", "тебя", "их",
        "чем", "была", "сам", "чтоб", "без", "будто", "чего", "раз",
        "тоже", "себе", "под", "будет", "ж", "тогда", "кто", "этот",
        "того", "потому", "этого", "какой", "совсем", "ним", "здесь",
        "этом", "один", "почти", "мой", "тем", "чтобы", "нее", "сейчас",
        "были", "куда", "зачем", "всех", "никогда", "можно", "при",
        "наконец", "два", "об", "другой", "хоть", "после", "над",
        "больше", "тот", "через", "эти", "нас", "про", "всего", "них",
        "какая", "много", "разве", "три", "эту", "моя", "впрочем",
        "хорошо", "свою", "этой", "перед", "иногда", "лучше", "чуть",
        "том", "нельзя", "такой", "им", "более", "всегда", "конечно",
        "всю", "между",
    ];
    WORDS.iter().map(|w| w.to_string()).collect()
});

/// Default Russian stop-word set shared by the tokenizer and the miner.
pub fn russian_stopwords() -> &'static HashSet<String> {
    &RUSSIAN_STOPWORDS
}

//! Affirmation Context - 系统默认肯定语
//!
//! 每个分类 20 条，顺序即默认排序

use super::Category;

pub const AFFIRMATIONS_PER_CATEGORY: usize = 20;

const FINANCEIRO: [&str; AFFIRMATIONS_PER_CATEGORY] = [
    "Eu sou um ímã para a prosperidade e a abundância.",
    "O dinheiro flui para mim com facilidade e alegria.",
    "Eu mereço ter uma vida financeira próspera.",
    "Cada dia eu atraio novas oportunidades de ganho.",
    "Eu administro meu dinheiro com sabedoria e equilíbrio.",
    "Minha renda cresce constantemente.",
    "Eu sou grato por todo o dinheiro que recebo.",
    "A abundância é o meu estado natural.",
    "Eu tomo decisões financeiras inteligentes.",
    "Eu libero todas as crenças limitantes sobre dinheiro.",
    "Minhas dívidas diminuem a cada dia.",
    "Eu tenho mais do que o suficiente para viver bem.",
    "Meu trabalho é valorizado e bem recompensado.",
    "Eu invisto em mim e colho os frutos.",
    "A riqueza chega até mim por caminhos inesperados.",
    "Eu me sinto seguro e tranquilo com minhas finanças.",
    "Eu compartilho minha prosperidade com generosidade.",
    "Eu sou capaz de criar a vida financeira que desejo.",
    "O universo conspira a favor da minha prosperidade.",
    "Eu estou aberto a receber todas as bênçãos financeiras.",
];

const SAUDE: [&str; AFFIRMATIONS_PER_CATEGORY] = [
    "Meu corpo é saudável, forte e cheio de energia.",
    "Cada célula do meu corpo vibra com saúde.",
    "Eu cuido do meu corpo com amor e respeito.",
    "Eu escolho alimentos que nutrem meu corpo.",
    "Minha respiração é calma e profunda.",
    "Eu me sinto mais saudável a cada dia.",
    "Meu corpo sabe se curar e se renovar.",
    "Eu tenho energia de sobra para viver plenamente.",
    "Eu honro meu corpo com descanso e movimento.",
    "Minha mente e meu corpo estão em harmonia.",
    "Eu libero toda a tensão do meu corpo.",
    "Eu bebo água e me sinto revigorado.",
    "Meu sistema imunológico é forte e equilibrado.",
    "Eu sou grato pela saúde que tenho.",
    "Eu me movimento com leveza e disposição.",
    "Cada dia eu faço escolhas que fortalecem minha saúde.",
    "Meu coração bate tranquilo e saudável.",
    "Eu mereço me sentir bem em meu próprio corpo.",
    "A vitalidade flui livremente por todo o meu ser.",
    "Eu estou em paz com meu corpo e com minha mente.",
];

const SONO: [&str; AFFIRMATIONS_PER_CATEGORY] = [
    "Eu relaxo profundamente e me entrego ao descanso.",
    "Minha mente se acalma e meus pensamentos desaceleram.",
    "Eu mereço uma noite de sono tranquila e reparadora.",
    "Meu corpo fica cada vez mais pesado e relaxado.",
    "Eu solto as preocupações do dia.",
    "Eu adormeço com facilidade e serenidade.",
    "Minha respiração fica lenta e suave.",
    "Eu estou seguro e protegido enquanto descanso.",
    "Cada respiração me leva a um relaxamento mais profundo.",
    "Eu acordo renovado e cheio de disposição.",
    "Meu quarto é um espaço de paz e descanso.",
    "Eu me permito desligar e simplesmente descansar.",
    "O silêncio da noite me envolve com calma.",
    "Meus músculos se soltam um a um.",
    "Eu confio que amanhã será um bom dia.",
    "Meu sono é profundo, contínuo e restaurador.",
    "Eu deixo o dia para trás com gratidão.",
    "Minha mente flutua em tranquilidade.",
    "Eu durmo bem e desperto em equilíbrio.",
    "A paz toma conta de todo o meu ser.",
];

const AUTOESTIMA: [&str; AFFIRMATIONS_PER_CATEGORY] = [
    "Eu me amo e me aceito completamente.",
    "Eu sou suficiente exatamente como sou.",
    "Eu mereço amor, respeito e felicidade.",
    "Eu confio em mim e nas minhas escolhas.",
    "Eu reconheço o meu valor.",
    "Eu sou digno de todas as coisas boas da vida.",
    "Eu me trato com gentileza e compaixão.",
    "Minha opinião sobre mim é a que mais importa.",
    "Eu celebro cada uma das minhas conquistas.",
    "Eu sou único e especial.",
    "Eu me perdoo pelos erros do passado.",
    "Eu tenho orgulho de quem estou me tornando.",
    "Eu irradio confiança e segurança.",
    "Eu aceito elogios com gratidão.",
    "Eu estabeleço limites saudáveis com amor.",
    "Eu sou capaz de superar qualquer desafio.",
    "Minha voz merece ser ouvida.",
    "Eu me olho no espelho com carinho.",
    "Eu escolho acreditar em mim.",
    "Eu sou a melhor versão de mim mesmo hoje.",
];

const PRODUTIVIDADE: [&str; AFFIRMATIONS_PER_CATEGORY] = [
    "Eu sou focado e produtivo.",
    "Eu realizo minhas tarefas com clareza e eficiência.",
    "Eu começo o dia com energia e determinação.",
    "Eu priorizo o que realmente importa.",
    "Minha mente está clara e concentrada.",
    "Eu concluo o que começo.",
    "Eu transformo meus objetivos em ações.",
    "Eu administro meu tempo com sabedoria.",
    "Eu sou disciplinado e consistente.",
    "Cada pequeno passo me aproxima das minhas metas.",
    "Eu encontro soluções criativas para os desafios.",
    "Eu trabalho com calma e atenção plena.",
    "Eu elimino as distrações com facilidade.",
    "Eu sou motivado pelos meus sonhos.",
    "Eu aprendo rapidamente e evoluo a cada dia.",
    "Eu faço pausas que renovam minha energia.",
    "Eu tenho orgulho do meu trabalho.",
    "Minhas ideias fluem com facilidade.",
    "Eu sou o responsável pelo meu sucesso.",
    "Eu termino o dia satisfeito com o que realizei.",
];

/// 获取分类的系统默认肯定语
pub fn default_affirmations(category: Category) -> &'static [&'static str] {
    match category {
        Category::Financeiro => &FINANCEIRO,
        Category::Saude => &SAUDE,
        Category::Sono => &SONO,
        Category::Autoestima => &AUTOESTIMA,
        Category::Produtividade => &PRODUTIVIDADE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_has_twenty_per_category() {
        let mut total = 0;
        for category in Category::ALL {
            let texts = default_affirmations(category);
            assert_eq!(texts.len(), AFFIRMATIONS_PER_CATEGORY);
            total += texts.len();
        }
        assert_eq!(total, 100);
    }

    #[test]
    fn test_catalog_texts_are_unique_and_valid() {
        let mut seen = HashSet::new();
        for category in Category::ALL {
            for text in default_affirmations(category) {
                assert!(crate::domain::AffirmationText::new(*text).is_ok());
                assert!(seen.insert(*text), "duplicate affirmation: {}", text);
            }
        }
    }
}

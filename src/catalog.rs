//! Static checklist template catalog.
//!
//! Templates are keyed by inspection category *name*. Checklists copy the items at
//! creation time, so edits here never reach existing checklists.

use crate::models::{AnswerKind, ChecklistItem};
use serde::Serialize;
use tracing::debug;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy)]
enum TemplateKind {
    Number(&'static str),
    Radio(&'static [&'static str]),
    Checkbox(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
struct ItemTemplate {
    id: &'static str,
    question: &'static str,
    kind: TemplateKind,
}

fn owned(options: &[&str]) -> Vec<String> {
    options.iter().map(|o| o.to_string()).collect()
}

impl ItemTemplate {
    fn instantiate(&self) -> ChecklistItem {
        let kind = match self.kind {
            TemplateKind::Number(unit) => AnswerKind::Number {
                unit: unit.to_string(),
            },
            TemplateKind::Radio(options) => AnswerKind::Radio {
                options: owned(options),
            },
            TemplateKind::Checkbox(options) => AnswerKind::Checkbox {
                options: owned(options),
            },
        };
        ChecklistItem {
            id: self.id.to_string(),
            question: self.question.to_string(),
            kind,
        }
    }
}

const fn number(id: &'static str, question: &'static str, unit: &'static str) -> ItemTemplate {
    ItemTemplate {
        id,
        question,
        kind: TemplateKind::Number(unit),
    }
}

const fn radio(
    id: &'static str,
    question: &'static str,
    options: &'static [&'static str],
) -> ItemTemplate {
    ItemTemplate {
        id,
        question,
        kind: TemplateKind::Radio(options),
    }
}

const fn checkbox(
    id: &'static str,
    question: &'static str,
    options: &'static [&'static str],
) -> ItemTemplate {
    ItemTemplate {
        id,
        question,
        kind: TemplateKind::Checkbox(options),
    }
}

const OK_NOK: &[&str] = &["OK", "NOK"];
const SIM_NAO_NA: &[&str] = &["SIM", "NÃO", "NA"];
const SIM_NAO_NA_TITLE: &[&str] = &["Sim", "Não", "NA"];
const SIM_NAO: &[&str] = &["SIM", "NÃO"];
const VERIFIED: &[&str] = &["Verificado"];

const GENERATORS: &[ItemTemplate] = &[
    number("g1", "Nível do óleo diesel (anotar qtde. aprox. em litros)", "litros"),
    number("g2", "Medir a tensão da bateria (anotar valor)", "V"),
    radio("g3", "Nível do óleo lubrificante", OK_NOK),
    radio("g4", "Nível da água do radiador", OK_NOK),
    radio("g5", "Funcionamento do sistema de pré-aquecimento", OK_NOK),
];

const RECALQUE_PUMPS: &[ItemTemplate] = &[
    radio("b1", "VERIFICAR SE EXISTE PONTOS DE VAZAMENTO NA BOMBA/TUBULAÇÕES", SIM_NAO_NA),
    radio("b2", "QUAL BOMBA ESTÁ EM USO?", &["BOMBA 01", "BOMBA 02"]),
    radio(
        "b3",
        "Verificar condições gerais do quadro elétrico (limpeza, oxidações, reapertos)",
        SIM_NAO_NA,
    ),
    number(
        "b4a",
        "Ligar a bomba no MODO MANUAL e medir/anotar valor da CORRENTE - FASE R",
        "A",
    ),
    number(
        "b4b",
        "Ligar a bomba no MODO MANUAL e medir/anotar valor da CORRENTE - FASE S",
        "A",
    ),
    number(
        "b4c",
        "Ligar a bomba no MODO MANUAL e medir/anotar valor da CORRENTE - FASE T",
        "A",
    ),
    checkbox("b5", "Retornar para MODO AUTOMÁTICO", &["Concluído"]),
];

const AIR_CONDITIONING: &[ItemTemplate] = &[
    radio("ac1", "Limpeza do filtro de ar", SIM_NAO_NA_TITLE),
    radio("ac2", "Verificação de vazamentos de gás refrigerante", SIM_NAO_NA_TITLE),
    radio("ac3", "Lubrificação dos componentes mecânicos", SIM_NAO_NA_TITLE),
    radio("ac4", "Verificação do sistema elétrico", SIM_NAO_NA_TITLE),
    radio("ac5a", "Verificação da pressão do sistema", SIM_NAO_NA_TITLE),
    number("ac5b", "Pressão", "PSI"),
    radio("ac6a", "Verificação da temperatura de saída de ar", SIM_NAO_NA_TITLE),
    number("ac6b", "Temperatura", "°C"),
    radio("ac7", "Verificação do controle remoto", SIM_NAO_NA_TITLE),
    radio("ac8", "Verificação do sistema de dreno", SIM_NAO_NA_TITLE),
    radio("ac9a", "Medir TENSÃO(V) do Equipamento", SIM_NAO_NA_TITLE),
    number("ac9b", "Tensão", "V"),
    radio("ac10a", "Medir CORRENTE (A) do Equipamento", SIM_NAO_NA_TITLE),
    number("ac10b", "Corrente", "A"),
];

const ELECTRICAL_PANELS: &[ItemTemplate] = &[
    radio(
        "qe1",
        "Limpeza geral do gabinete, com uso de aspiradores ou pincel, caso necessário.",
        SIM_NAO_NA,
    ),
    radio(
        "qe2",
        "Verificar se o quadro possue tranca ou cadeado na porta.",
        SIM_NAO_NA,
    ),
    radio("qe3", "Realizar reaperto de possível.", SIM_NAO_NA),
    number("qe4a", "Realizar medição de Tensão entre Fases - RS", "V"),
    number("qe4b", "Realizar medição de Tensão entre Fases - RT", "V"),
    number("qe4c", "Realizar medição de Tensão entre Fases - ST", "V"),
    number("qe5a", "Realizar medição de Tensão entre Fase e Neutro - RN", "V"),
    number("qe5b", "Realizar medição de Tensão entre Fase e Neutro - SN", "V"),
    number("qe5c", "Realizar medição de Tensão entre Fase e Neutro - TN", "V"),
    number("qe6a", "Realizar medição de Corrente - FASE R", "A"),
    number("qe6b", "Realizar medição de Corrente - FASE S", "A"),
    number("qe6c", "Realizar medição de Corrente - FASE T", "A"),
    number("qe7", "Realizar medição de Tensão e Terra - Fase/Neutro", "V"),
    radio(
        "qe8",
        "Verificar se há sinais de aquecimento nos fios, terminais, disjuntores, etc...",
        SIM_NAO_NA,
    ),
];

const MEDICAL_GASES: &[ItemTemplate] = &[
    number("gm1a", "TANQUE OXIGÊNIO REGIONAL (23442) - NÍVEL (VOL)", ""),
    number("gm1b", "TANQUE OXIGÊNIO REGIONAL (23442) - PRESSÃO TQ.", ""),
    number("gm1c", "TANQUE OXIGÊNIO REGIONAL (23442) - PRESSÃO DA LINHA", ""),
    number("gm2a", "TANQUE OXIGÊNIO LEONOR (23280) - NÍVEL (VOL)", ""),
    number("gm2b", "TANQUE OXIGÊNIO LEONOR (23280) - PRESSÃO TQ.", ""),
    number("gm2c", "TANQUE OXIGÊNIO LEONOR (23280) - PRESSÃO DA LINHA", ""),
    number("gm3a", "TANQUE OXIGÊNIO RESERVA (20698) - NÍVEL (VOL)", ""),
    number("gm3b", "TANQUE OXIGÊNIO RESERVA (20698) - PRESSÃO TQ.", ""),
    number("gm3c", "TANQUE OXIGÊNIO RESERVA (20698) - PRESSÃO DA LINHA", ""),
    number("gm4a", "MÓDULO DE AR MEDICINAL (VALMIG) - PRESSÃO DA LINHA", ""),
    radio("gm4b", "MÓDULO DE AR MEDICINAL (VALMIG) - MÓDULO C/ ALARME?", SIM_NAO),
    number("gm5a", "BACKUP BATERIA DE AR MEDICINAL (VALMIG) - PRESSÃO BANCO 1", ""),
    number("gm5b", "BACKUP BATERIA DE AR MEDICINAL (VALMIG) - PRESSÃO BANCO 2", ""),
];

const BOILER: &[ItemTemplate] = &[
    checkbox(
        "bo1",
        "Verificar se existe vazamentos (bombas, tubulações, etc)",
        VERIFIED,
    ),
    checkbox(
        "bo2",
        "Verificar condições gerais do quadro elétrico (limpeza, oxidações, reapertos)",
        VERIFIED,
    ),
    radio("bo3", "Qual bomba está em funcionamento?", &["Bomba 01", "Bomba 02"]),
    number("bo4", "Anotar a TEMPERATURA da resistencia 01", "°C"),
    number("bo5", "Anotar a TEMPERATURA da resistencia 02", "°C"),
    number("bo6", "Anotar a CORRENTE (A) da resistencia 01", "A"),
    number("bo7", "Anotar a CORRENTE (A) da resistencia 02", "A"),
    number("bo8", "Anotar a TEMPERATURA (ºC) do boiller", "°C"),
];

const ELEVATORS: &[ItemTemplate] = &[
    checkbox("el1", "Cabine limpa e sem danos (pisos, paredes, teto)", VERIFIED),
    checkbox("el2", "Espelho (se houver) limpo e sem trincas", VERIFIED),
    checkbox("el3", "Iluminação interna funcionando corretamente", VERIFIED),
    checkbox(
        "el4",
        "Painel de botões funcionando (todos os andares respondem)",
        VERIFIED,
    ),
    checkbox("el5", "Indicador de andares funcionando", VERIFIED),
    checkbox("el6", "Campainha de emergência funcionando", VERIFIED),
    checkbox(
        "el7",
        "Comunicação de emergência (interfone ou botão de alarme) testada",
        VERIFIED,
    ),
    checkbox("el8", "Portas abrem e fecham corretamente, sem trancos", VERIFIED),
    checkbox("el9", "Sem ruídos anormais durante o funcionamento", VERIFIED),
    checkbox("el10", "Tempo de espera aceitável", VERIFIED),
    checkbox("el11", "Corrimão firme (se aplicável)", VERIFIED),
];

/// Catalog entries in declaration order
const CATALOG: &[(&str, &[ItemTemplate])] = &[
    ("RONDA DIÁRIA DE GERADORES", GENERATORS),
    ("RONDA DIÁRIA DE BOMBAS DE RECALQUE", RECALQUE_PUMPS),
    ("PREVENTIVA DE AR CONDICIONADO", AIR_CONDITIONING),
    ("PREVENTIVA DE QUADROS ELÉTRICOS", ELECTRICAL_PANELS),
    ("RONDA DIÁRIA DE GASES MEDICINAIS", MEDICAL_GASES),
    ("RONDA DIÁRIA DE BOILER", BOILER),
    ("RONDA DIÁRIA DE ELEVADORES", ELEVATORS),
];

/// A catalog entry with its items, as served by the template endpoint
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChecklistTemplate {
    pub name: String,
    pub items: Vec<ChecklistItem>,
}

/// Fresh copy of the items for `category_name`. Unknown names give an empty list.
pub fn instantiate(category_name: &str) -> Vec<ChecklistItem> {
    match CATALOG.iter().find(|(name, _)| *name == category_name) {
        Some((_, templates)) => templates.iter().map(ItemTemplate::instantiate).collect(),
        None => {
            debug!(category = category_name, "no checklist template for category");
            Vec::new()
        }
    }
}

/// Catalog keys in declaration order
pub fn category_names() -> Vec<&'static str> {
    CATALOG.iter().map(|(name, _)| *name).collect()
}

pub fn templates() -> Vec<ChecklistTemplate> {
    CATALOG
        .iter()
        .map(|(name, _)| ChecklistTemplate {
            name: (*name).to_string(),
            items: instantiate(name),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::inspection_category::DEFAULT_INSPECTION_CATEGORIES;
    use std::collections::HashSet;

    #[test]
    fn every_default_category_has_a_template() {
        for name in DEFAULT_INSPECTION_CATEGORIES {
            assert!(!instantiate(name).is_empty(), "missing template for {name}");
        }
        assert_eq!(category_names().len(), 7);
        assert_eq!(category_names()[0], "RONDA DIÁRIA DE GERADORES");
        assert_eq!(category_names()[6], "RONDA DIÁRIA DE ELEVADORES");
    }

    #[test]
    fn item_counts_match_catalog() {
        assert_eq!(instantiate("RONDA DIÁRIA DE GERADORES").len(), 5);
        assert_eq!(instantiate("RONDA DIÁRIA DE BOMBAS DE RECALQUE").len(), 7);
        assert_eq!(instantiate("PREVENTIVA DE AR CONDICIONADO").len(), 14);
        assert_eq!(instantiate("PREVENTIVA DE QUADROS ELÉTRICOS").len(), 14);
        assert_eq!(instantiate("RONDA DIÁRIA DE GASES MEDICINAIS").len(), 13);
        assert_eq!(instantiate("RONDA DIÁRIA DE BOILER").len(), 8);
        assert_eq!(instantiate("RONDA DIÁRIA DE ELEVADORES").len(), 11);
    }

    #[test]
    fn item_ids_are_unique_within_a_template() {
        for name in category_names() {
            let items = instantiate(name);
            let ids: HashSet<_> = items.iter().map(|i| i.id.clone()).collect();
            assert_eq!(ids.len(), items.len(), "duplicate ids in {name}");
        }
    }

    #[test]
    fn instances_are_independent_copies() {
        let mut first = instantiate("RONDA DIÁRIA DE GERADORES");
        first[0].question.push_str(" (editado)");
        if let AnswerKind::Radio { options } = &mut first[2].kind {
            options.clear();
        }

        let second = instantiate("RONDA DIÁRIA DE GERADORES");
        assert_eq!(
            second[0].question,
            "Nível do óleo diesel (anotar qtde. aprox. em litros)"
        );
        assert_eq!(
            second[2].kind,
            AnswerKind::Radio {
                options: vec!["OK".into(), "NOK".into()]
            }
        );
    }

    #[test]
    fn unknown_category_yields_empty_list() {
        assert!(instantiate("CATEGORIA INEXISTENTE").is_empty());
        assert!(instantiate("ronda diária de geradores").is_empty());
    }
}

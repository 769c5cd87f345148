//! Inserção de trechos de diagnóstico na posição do cursor capturada ao abrir o seletor.
//!
//! O modal do seletor tira o foco do editor, então a seleção é lida antes de
//! abrir e reaplicada quando uma linha é escolhida.

/// Visão mínima de um editor de texto. Posições contam caracteres, não bytes.
pub trait TextSurface {
    /// Início da seleção atual, se houver.
    fn selection_offset(&self) -> Option<usize>;

    /// Insere `text` em `offset` e devolve a posição usada de fato
    /// (posições além do fim param no fim).
    fn insert_at(&mut self, offset: usize, text: &str) -> usize;

    /// Reduz a seleção a `offset`.
    fn set_cursor(&mut self, offset: usize);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickerState {
    #[default]
    Idle,
    AwaitingSelection {
        captured: Option<usize>,
    },
}

/// Resultado da escolha de um trecho.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    Inserted { offset: usize, cursor: usize },
    /// O seletor não estava aberto; nada mudou.
    Skipped,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnippetInserter {
    state: PickerState,
}

impl SnippetInserter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PickerState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, PickerState::AwaitingSelection { .. })
    }

    /// Posição capturada na abertura, se houver.
    pub fn captured(&self) -> Option<usize> {
        match self.state {
            PickerState::AwaitingSelection { captured } => captured,
            PickerState::Idle => None,
        }
    }

    /// Abre o seletor capturando a seleção do editor. Abrir de novo
    /// recaptura.
    pub fn open<S: TextSurface + ?Sized>(&mut self, surface: &S) {
        self.state = PickerState::AwaitingSelection {
            captured: surface.selection_offset(),
        };
    }

    /// Insere `text` e fecha o seletor.
    ///
    /// Sem posição capturada usa a seleção atual do editor e, na falta dela,
    /// o início do texto.
    pub fn pick<S: TextSurface + ?Sized>(&mut self, surface: &mut S, text: &str) -> Insertion {
        let PickerState::AwaitingSelection { captured } = std::mem::take(&mut self.state) else {
            return Insertion::Skipped;
        };

        let requested = captured
            .or_else(|| surface.selection_offset())
            .unwrap_or(0);
        let offset = surface.insert_at(requested, text);
        let cursor = offset + text.chars().count();
        surface.set_cursor(cursor);

        tracing::debug!(offset, cursor, "snippet inserted");
        Insertion::Inserted { offset, cursor }
    }

    /// Fecha o seletor sem inserir. A posição capturada é descartada.
    pub fn dismiss(&mut self) {
        self.state = PickerState::Idle;
    }
}

/// Ctrl+Espaço abre o seletor de diagnósticos.
pub fn is_picker_shortcut(ctrl_key: bool, code: &str) -> bool {
    ctrl_key && code == "Space"
}

/// Editor em memória: um texto e um cursor opcional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringSurface {
    text: String,
    cursor: Option<usize>,
}

impl StringSurface {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            cursor: None,
        }
    }

    pub fn with_cursor(mut self, offset: usize) -> Self {
        self.cursor = Some(offset);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn clear_selection(&mut self) {
        self.cursor = None;
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

impl TextSurface for StringSurface {
    fn selection_offset(&self) -> Option<usize> {
        self.cursor
    }

    fn insert_at(&mut self, offset: usize, text: &str) -> usize {
        let offset = offset.min(self.char_len());
        let byte_index = self
            .text
            .char_indices()
            .nth(offset)
            .map(|(index, _)| index)
            .unwrap_or(self.text.len());
        self.text.insert_str(byte_index, text);
        offset
    }

    fn set_cursor(&mut self, offset: usize) {
        self.cursor = Some(offset.min(self.char_len()));
    }
}

//! Os controles de texto do navegador contam posições em unidades UTF-16,
//! enquanto o modelo do editor conta caracteres.

/// Posição em caracteres da posição UTF-16 `units` em `text`.
///
/// Uma posição no meio de um par substituto avança para o próximo caractere.
pub fn utf16_to_chars(text: &str, units: usize) -> usize {
    let mut consumed = 0;
    for (index, ch) in text.chars().enumerate() {
        if consumed >= units {
            return index;
        }
        consumed += ch.len_utf16();
    }
    text.chars().count()
}

/// Posição UTF-16 da posição em caracteres `chars` em `text`, limitada ao fim.
pub fn chars_to_utf16(text: &str, chars: usize) -> usize {
    text.chars().take(chars).map(char::len_utf16).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_and_accents_match() {
        let text = "Conclusão: negativo";
        assert_eq!(utf16_to_chars(text, 10), 10);
        assert_eq!(chars_to_utf16(text, 10), 10);
    }

    #[test]
    fn astral_characters_take_two_units() {
        let text = "a😀b";
        assert_eq!(chars_to_utf16(text, 2), 3);
        assert_eq!(utf16_to_chars(text, 3), 2);
        assert_eq!(utf16_to_chars(text, 2), 2);
    }

    #[test]
    fn offsets_past_the_end_clamp() {
        assert_eq!(utf16_to_chars("abc", 40), 3);
        assert_eq!(chars_to_utf16("abc", 40), 3);
    }
}

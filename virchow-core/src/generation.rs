//! Marcas para descartar respostas que chegam depois de uma requisição mais nova.

/// Contador crescente; cada `begin` invalida todos os tickets anteriores.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestGeneration {
    current: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

impl RequestGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) -> Ticket {
        self.current += 1;
        Ticket(self.current)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.current
    }
}
